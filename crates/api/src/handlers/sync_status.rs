//! Handler for the background sync status.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /sync-status
pub async fn sync_status(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let status = state.sync_status.snapshot().await;
    Ok(Json(DataResponse { data: status }))
}
