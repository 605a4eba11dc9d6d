use thiserror::Error;

use crate::services::StoreError;

// Make the response module public
pub mod response;

#[derive(Error, Debug)]
pub enum AppError {
    // The #[from] attribute converts a StoreError into an AppError::Store
    // using the From trait.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    #[error("task with id: {0} does not exist")]
    TaskNotFound(usize),

    #[error("user with id: {0} does not exist")]
    UnknownUser(String),

    #[error("user with name: {0} does not exist")]
    UnknownUsername(String),

    #[error("value {0} is not a valid unix timestamp")]
    InvalidTimestamp(i64),
}

// Custom result type
pub type AppResult<T> = Result<T, AppError>;
