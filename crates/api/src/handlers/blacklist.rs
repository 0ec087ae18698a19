//! Handlers for the global IP blacklist.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;

use crate::error::AppResult;
use crate::response::{DataResponse, MessageResponse};
use crate::state::AppState;
use crate::sync::{self, BlacklistMutation};

/// GET /blacklist
///
/// Current blacklist: persisted valid entries, or the gateway's live list
/// when persistence is disabled.
pub async fn list_blacklist(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let entries = sync::read_blacklist(&state).await?;
    Ok(Json(DataResponse { data: entries }))
}

/// POST /blacklist
///
/// Add or remove one IP/CIDR and push the resulting list to the gateway.
pub async fn mutate_blacklist(
    State(state): State<AppState>,
    Json(req): Json<BlacklistMutation>,
) -> AppResult<impl IntoResponse> {
    let message = sync::mutate_blacklist(&state, &req).await?;
    Ok(Json(MessageResponse { message }))
}
