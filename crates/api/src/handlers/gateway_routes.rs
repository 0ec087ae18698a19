//! Handlers proxying gateway route configuration.
//!
//! Routes live on the gateway only; nothing here touches the database except
//! the audit trail.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use apimgr_core::audit::{AuditAction, AuditResource};
use apimgr_core::error::CoreError;
use apimgr_gateway::types::Route;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /routes
pub async fn list_routes(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let routes = state.gateway.list_routes().await?;
    Ok(Json(DataResponse { data: routes }))
}

/// GET /routes/{id}
pub async fn get_route(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let route = state
        .gateway
        .get_route(&id)
        .await?
        .ok_or_else(|| CoreError::not_found("Route", &id))?;
    Ok(Json(DataResponse { data: route }))
}

/// POST /routes
///
/// Create-or-replace a route. The id comes from the body or is generated.
pub async fn create_route(
    State(state): State<AppState>,
    Json(mut route): Json<Route>,
) -> AppResult<impl IntoResponse> {
    let id = route
        .id
        .clone()
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
    route.id = Some(id.clone());

    state.gateway.put_route(&id, &route).await?;
    state
        .audit
        .record(
            None,
            AuditAction::Create,
            AuditResource::Route,
            serde_json::json!({ "id": id, "uri": route.uri }),
        )
        .await;

    Ok((StatusCode::CREATED, Json(DataResponse { data: route })))
}

/// PUT /routes/{id}
pub async fn update_route(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(mut route): Json<Route>,
) -> AppResult<impl IntoResponse> {
    route.id = Some(id.clone());
    state.gateway.put_route(&id, &route).await?;
    state
        .audit
        .record(
            None,
            AuditAction::Update,
            AuditResource::Route,
            serde_json::json!({ "id": id, "uri": route.uri }),
        )
        .await;
    Ok(Json(DataResponse { data: route }))
}

/// DELETE /routes/{id}
///
/// Best-effort on the gateway side; always acknowledged with 204.
pub async fn delete_route(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<impl IntoResponse> {
    state.gateway.delete_route(&id).await?;
    state
        .audit
        .record(
            None,
            AuditAction::Delete,
            AuditResource::Route,
            serde_json::json!({ "id": id }),
        )
        .await;
    Ok(StatusCode::NO_CONTENT)
}
