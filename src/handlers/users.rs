use axum::{
    extract::{Json, Path, State},
    response::{IntoResponse, Response},
};

use crate::errors::{AppError, AppResult};
use crate::models::UserAccount;
use crate::AppState;
use super::task::TaskView;

// Read-only listing endpoints; these never expose password hashes or
// session tokens.

pub async fn list_users(State(state): State<AppState>) -> AppResult<Response> {
    tracing::info!("list users attempt");

    let users = state.store.list_all().await?;
    Ok(Json(users).into_response())
}

pub async fn get_user(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> AppResult<Response> {
    tracing::info!("get user attempt: {}", name);

    let user = account_by_name(&state, &name).await?;
    Ok(Json(user.summary()).into_response())
}

pub async fn user_tasks(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> AppResult<Response> {
    tracing::info!("get tasks by name attempt: {}", name);

    let user = account_by_name(&state, &name).await?;
    let view: Vec<TaskView> = user.tasks.into_iter().map(TaskView::from).collect();
    Ok(Json(view).into_response())
}

pub async fn user_task(
    State(state): State<AppState>,
    Path((name, task_id)): Path<(String, usize)>,
) -> AppResult<Response> {
    tracing::info!("get task by name attempt: {} for task: {}", name, task_id);

    let user = account_by_name(&state, &name).await?;
    let task = user
        .tasks
        .into_iter()
        .find(|task| task.id == task_id)
        .ok_or(AppError::TaskNotFound(task_id))?;
    Ok(Json(TaskView::from(task)).into_response())
}

async fn account_by_name(state: &AppState, name: &str) -> AppResult<UserAccount> {
    let id = state
        .store
        .find_by_username(name)
        .await?
        .ok_or_else(|| AppError::UnknownUsername(name.to_string()))?;
    state
        .store
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::UnknownUsername(name.to_string()))
}
