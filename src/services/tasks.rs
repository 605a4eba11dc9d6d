use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::errors::{AppError, AppResult};
use crate::models::{TaskRecord, UserAccount};
use super::store::{UserStore, UserUpdate};

// Task fields as supplied by the caller; the editor assigns the id.
#[derive(Debug, Clone)]
pub struct TaskDraft {
    pub title: String,
    pub description: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
}

/// Editor for a user's embedded task list. Authorization is the caller's
/// responsibility: every mutating route runs the session check first and
/// the editor does not re-verify.
///
/// Every mutation rewrites the whole task array in a single store update,
/// so two concurrent mutations on the same account can silently lose one
/// writer's change.
#[derive(Clone)]
pub struct TaskService {
    store: Arc<dyn UserStore>,
}

impl TaskService {
    pub fn new(store: Arc<dyn UserStore>) -> Self {
        Self { store }
    }

    pub async fn list(&self, user_id: &str) -> AppResult<Vec<TaskRecord>> {
        Ok(self.account(user_id).await?.tasks)
    }

    pub async fn get(&self, user_id: &str, task_id: usize) -> AppResult<TaskRecord> {
        let account = self.account(user_id).await?;
        account
            .tasks
            .into_iter()
            .find(|task| task.id == task_id)
            .ok_or(AppError::TaskNotFound(task_id))
    }

    /// Appends a task. Ids are always dense 0..n-1, so the next id is the
    /// current length.
    pub async fn create(&self, user_id: &str, draft: TaskDraft) -> AppResult<usize> {
        let mut account = self.account(user_id).await?;
        let id = account.tasks.len();
        account.tasks.push(TaskRecord {
            id,
            title: draft.title,
            description: draft.description,
            start_time: draft.start_time,
            end_time: draft.end_time,
        });

        self.persist(user_id, account.tasks).await?;
        Ok(id)
    }

    pub async fn update(&self, user_id: &str, task_id: usize, draft: TaskDraft) -> AppResult<()> {
        let mut account = self.account(user_id).await?;
        let pos = account
            .tasks
            .iter()
            .position(|task| task.id == task_id)
            .ok_or(AppError::TaskNotFound(task_id))?;

        let task = &mut account.tasks[pos];
        task.title = draft.title;
        task.description = draft.description;
        task.start_time = draft.start_time;
        task.end_time = draft.end_time;

        self.persist(user_id, account.tasks).await
    }

    /// Removes a task and re-numbers every remaining task to its new
    /// position, keeping ids dense and zero-based. Callers must re-fetch
    /// ids after any delete.
    pub async fn delete(&self, user_id: &str, task_id: usize) -> AppResult<()> {
        let mut account = self.account(user_id).await?;
        let pos = account
            .tasks
            .iter()
            .position(|task| task.id == task_id)
            .ok_or(AppError::TaskNotFound(task_id))?;

        account.tasks.remove(pos);
        for (index, task) in account.tasks.iter_mut().enumerate() {
            task.id = index;
        }

        self.persist(user_id, account.tasks).await
    }

    async fn account(&self, user_id: &str) -> AppResult<UserAccount> {
        self.store
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::UnknownUser(user_id.to_string()))
    }

    async fn persist(&self, user_id: &str, tasks: Vec<TaskRecord>) -> AppResult<()> {
        if !self
            .store
            .update_by_id(user_id, UserUpdate::Tasks(tasks))
            .await?
        {
            return Err(AppError::UnknownUser(user_id.to_string()));
        }
        Ok(())
    }
}
