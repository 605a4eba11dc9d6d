use axum::{
    extract::{Json, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::errors::{AppError, AppResult};
use crate::models::{SessionQuery, TaskForm, TaskRecord};
use crate::services::{AuthOutcome, TaskDraft};
use crate::AppState;

// Task as it is reported to clients: dates as unix-epoch seconds
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskView {
    pub id: usize,
    pub title: String,
    pub description: String,
    pub start_date: i64,
    pub end_date: i64,
}

impl From<TaskRecord> for TaskView {
    fn from(record: TaskRecord) -> Self {
        Self {
            id: record.id,
            title: record.title,
            description: record.description,
            start_date: record.start_time.timestamp(),
            end_date: record.end_time.timestamp(),
        }
    }
}

pub async fn list_tasks(
    State(state): State<AppState>,
    Query(session): Query<SessionQuery>,
) -> AppResult<Response> {
    tracing::info!("get tasks attempt: {}", session.id);

    let outcome = state.auth.is_logged_in(&session.id, &session.token).await?;
    if outcome != AuthOutcome::Success {
        return Ok(outcome.into_response());
    }

    let tasks = state.tasks.list(&session.id).await?;
    let view: Vec<TaskView> = tasks.into_iter().map(TaskView::from).collect();
    Ok(Json(view).into_response())
}

pub async fn get_task(
    State(state): State<AppState>,
    Path(task_id): Path<usize>,
    Query(session): Query<SessionQuery>,
) -> AppResult<Response> {
    tracing::info!("get task attempt: {} for task: {}", session.id, task_id);

    let outcome = state.auth.is_logged_in(&session.id, &session.token).await?;
    if outcome != AuthOutcome::Success {
        return Ok(outcome.into_response());
    }

    let task = state.tasks.get(&session.id, task_id).await?;
    Ok(Json(TaskView::from(task)).into_response())
}

pub async fn create_task(
    State(state): State<AppState>,
    Query(session): Query<SessionQuery>,
    Json(form): Json<TaskForm>,
) -> AppResult<Response> {
    tracing::info!("create task attempt: {}", session.id);

    let outcome = state.auth.is_logged_in(&session.id, &session.token).await?;
    if outcome != AuthOutcome::Success {
        return Ok(outcome.into_response());
    }

    let draft = draft_from_form(form)?;
    state.tasks.create(&session.id, draft).await?;
    Ok(StatusCode::ACCEPTED.into_response())
}

// The task to update is named by the id field of the payload
pub async fn update_task(
    State(state): State<AppState>,
    Query(session): Query<SessionQuery>,
    Json(form): Json<TaskForm>,
) -> AppResult<Response> {
    tracing::info!("update task attempt: {} for task: {}", session.id, form.id);

    let outcome = state.auth.is_logged_in(&session.id, &session.token).await?;
    if outcome != AuthOutcome::Success {
        return Ok(outcome.into_response());
    }

    let task_id = form.id;
    let draft = draft_from_form(form)?;
    state.tasks.update(&session.id, task_id, draft).await?;
    Ok(StatusCode::ACCEPTED.into_response())
}

pub async fn delete_task(
    State(state): State<AppState>,
    Path(task_id): Path<usize>,
    Query(session): Query<SessionQuery>,
) -> AppResult<Response> {
    tracing::info!("delete task attempt: {} for task: {}", session.id, task_id);

    let outcome = state.auth.is_logged_in(&session.id, &session.token).await?;
    if outcome != AuthOutcome::Success {
        return Ok(outcome.into_response());
    }

    state.tasks.delete(&session.id, task_id).await?;
    Ok(StatusCode::ACCEPTED.into_response())
}

fn draft_from_form(form: TaskForm) -> AppResult<TaskDraft> {
    Ok(TaskDraft {
        title: form.title,
        description: form.description,
        start_time: epoch_seconds(form.start_date)?,
        end_time: epoch_seconds(form.end_date)?,
    })
}

fn epoch_seconds(value: i64) -> AppResult<DateTime<Utc>> {
    DateTime::from_timestamp(value, 0).ok_or(AppError::InvalidTimestamp(value))
}
