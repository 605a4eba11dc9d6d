use axum::{
    extract::{Json, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::errors::AppResult;
use crate::models::Credentials;
use crate::services::LoginResult;
use crate::AppState;

pub async fn create_account(
    State(state): State<AppState>,
    Json(info): Json<Credentials>,
) -> AppResult<Response> {
    tracing::info!("create account attempt: {}", info.username);

    let outcome = state
        .auth
        .create_account(&info.username, &info.password)
        .await?;
    Ok(outcome.into_response())
}

#[axum::debug_handler]
pub async fn login(
    State(state): State<AppState>,
    Json(info): Json<Credentials>,
) -> AppResult<Response> {
    tracing::info!("login attempt: {}", info.username);

    match state.auth.login(&info.username, &info.password).await? {
        LoginResult::Granted { user_id, token } => Ok((
            StatusCode::ACCEPTED,
            Json(json!({
                "result": "success",
                "userId": user_id,
                "token": token,
            })),
        )
            .into_response()),
        LoginResult::Denied(outcome) => Ok(outcome.into_response()),
    }
}

// The body is the bare user id as a JSON string
#[axum::debug_handler]
pub async fn logout(
    State(state): State<AppState>,
    Json(user_id): Json<String>,
) -> AppResult<Response> {
    tracing::info!("logout attempt: {}", user_id);

    let outcome = state.auth.logout(&user_id).await?;
    Ok(outcome.into_response())
}
