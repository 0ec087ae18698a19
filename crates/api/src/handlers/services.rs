//! Handlers proxying gateway services (shared upstream + plugin bundles).

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use apimgr_core::audit::{AuditAction, AuditResource};
use apimgr_core::error::CoreError;
use apimgr_gateway::types::Service;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /services
pub async fn list_services(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let services = state.gateway.list_services().await?;
    Ok(Json(DataResponse { data: services }))
}

/// GET /services/{id}
pub async fn get_service(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let service = state
        .gateway
        .get_service(&id)
        .await?
        .ok_or_else(|| CoreError::not_found("Service", &id))?;
    Ok(Json(DataResponse { data: service }))
}

/// POST /services
///
/// Create-or-replace a service. The id comes from the body or is generated.
pub async fn create_service(
    State(state): State<AppState>,
    Json(mut service): Json<Service>,
) -> AppResult<impl IntoResponse> {
    let id = service
        .id
        .clone()
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
    service.id = Some(id.clone());

    state.gateway.put_service(&id, &service).await?;
    state
        .audit
        .record(
            None,
            AuditAction::Create,
            AuditResource::Service,
            serde_json::json!({ "id": id, "name": service.name }),
        )
        .await;

    Ok((StatusCode::CREATED, Json(DataResponse { data: service })))
}

/// DELETE /services/{id}
///
/// Best-effort on the gateway side; always acknowledged with 204.
pub async fn delete_service(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<impl IntoResponse> {
    state.gateway.delete_service(&id).await?;
    state
        .audit
        .record(
            None,
            AuditAction::Delete,
            AuditResource::Service,
            serde_json::json!({ "id": id }),
        )
        .await;
    Ok(StatusCode::NO_CONTENT)
}
