use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::errors::AppError;
use crate::services::AuthOutcome;

// Converts AppError into a well-formed HTTP response. Store failures are
// reported generically so hashes and internals never reach the client.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::Store(e) => {
                tracing::error!("store failure: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal storage error".to_string(),
                )
                    .into_response()
            }

            AppError::TaskNotFound(_) => {
                (StatusCode::NOT_FOUND, self.to_string()).into_response()
            }

            AppError::UnknownUser(_) | AppError::UnknownUsername(_) => {
                (StatusCode::BAD_REQUEST, self.to_string()).into_response()
            }

            AppError::InvalidTimestamp(_) => {
                (StatusCode::BAD_REQUEST, self.to_string()).into_response()
            }
        }
    }
}

// One outcome, one status code and message; the mapping is purely
// mechanical.
impl IntoResponse for AuthOutcome {
    fn into_response(self) -> Response {
        match self {
            AuthOutcome::Success => StatusCode::ACCEPTED.into_response(),
            AuthOutcome::WrongPassword => {
                (StatusCode::BAD_REQUEST, "wrong password").into_response()
            }
            AuthOutcome::UserDoesNotExist => {
                (StatusCode::BAD_REQUEST, "user does not exist").into_response()
            }
            AuthOutcome::UserAlreadyExists => {
                (StatusCode::BAD_REQUEST, "user already exists").into_response()
            }
            AuthOutcome::NotLoggedIn => {
                (StatusCode::BAD_REQUEST, "user is not logged in").into_response()
            }
            AuthOutcome::InvalidToken => {
                (StatusCode::BAD_REQUEST, "the token is invalid").into_response()
            }
            AuthOutcome::UserAlreadyLoggedIn => {
                (StatusCode::BAD_REQUEST, "user is already logged in").into_response()
            }
        }
    }
}
