//! Handlers proxying gateway consumers.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use apimgr_core::audit::{AuditAction, AuditResource};
use apimgr_core::error::CoreError;
use apimgr_gateway::types::Consumer;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /consumers
pub async fn list_consumers(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let consumers = state.gateway.list_consumers().await?;
    Ok(Json(DataResponse { data: consumers }))
}

/// GET /consumers/{username}
pub async fn get_consumer(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> AppResult<impl IntoResponse> {
    let consumer = state
        .gateway
        .get_consumer(&username)
        .await?
        .ok_or_else(|| CoreError::not_found("Consumer", &username))?;
    Ok(Json(DataResponse { data: consumer }))
}

/// POST /consumers
///
/// Create-or-replace a consumer keyed by its username.
pub async fn create_consumer(
    State(state): State<AppState>,
    Json(consumer): Json<Consumer>,
) -> AppResult<impl IntoResponse> {
    if consumer.username.trim().is_empty() {
        return Err(CoreError::Validation("username is required".to_string()).into());
    }

    state
        .gateway
        .put_consumer(&consumer.username, &consumer)
        .await?;
    state
        .audit
        .record(
            None,
            AuditAction::Create,
            AuditResource::Consumer,
            serde_json::json!({ "username": consumer.username }),
        )
        .await;

    Ok((StatusCode::CREATED, Json(DataResponse { data: consumer })))
}

/// DELETE /consumers/{username}
///
/// Best-effort on the gateway side; always acknowledged with 204.
pub async fn delete_consumer(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> AppResult<impl IntoResponse> {
    state.gateway.delete_consumer(&username).await?;
    state
        .audit
        .record(
            None,
            AuditAction::Delete,
            AuditResource::Consumer,
            serde_json::json!({ "username": username }),
        )
        .await;
    Ok(StatusCode::NO_CONTENT)
}
