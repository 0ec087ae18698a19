//! Handlers for per-route IP whitelists.

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;

use crate::error::AppResult;
use crate::response::{DataResponse, MessageResponse};
use crate::state::AppState;
use crate::sync::{self, WhitelistMutation};

/// GET /whitelist/route/{route_id}
pub async fn list_whitelist(
    State(state): State<AppState>,
    Path(route_id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let entries = sync::read_whitelist(&state, &route_id).await?;
    Ok(Json(DataResponse { data: entries }))
}

/// POST /whitelist/route/{route_id}
///
/// Add or remove one IP/CIDR on the route's ip-restriction whitelist.
pub async fn mutate_whitelist(
    State(state): State<AppState>,
    Path(route_id): Path<String>,
    Json(req): Json<WhitelistMutation>,
) -> AppResult<impl IntoResponse> {
    let message = sync::mutate_whitelist(&state, &route_id, &req).await?;
    Ok(Json(MessageResponse { message }))
}
