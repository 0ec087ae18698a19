//! Handlers for API key issuance, listing, quota updates, and rotation.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use uuid::Uuid;

use apimgr_core::error::CoreError;
use apimgr_db::models::api_key::QuotaLimits;
use apimgr_db::repositories::ApiKeyRepo;

use serde::Deserialize;

use crate::error::AppResult;
use crate::keys::{self, CreateKeyRequest};
use crate::response::{DataResponse, MessageResponse};
use crate::state::AppState;

/// POST /keys
///
/// Issue a key for a consumer. The plaintext appears in this response and
/// nowhere else.
pub async fn create_key(
    State(state): State<AppState>,
    Json(req): Json<CreateKeyRequest>,
) -> AppResult<impl IntoResponse> {
    let issued = keys::create_key(&state, &req).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: issued })))
}

/// GET /keys
///
/// Key metadata joined with quotas. Hashes and plaintexts never appear here.
pub async fn list_keys(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let keys = ApiKeyRepo::list_with_quotas(&state.pool).await?;
    Ok(Json(DataResponse { data: keys }))
}

#[derive(Debug, Deserialize)]
pub struct VerifyKeyRequest {
    #[serde(alias = "apiKey")]
    pub api_key: String,
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
}

fn default_endpoint() -> String {
    "/".to_string()
}

/// POST /keys/verify
///
/// Verify a presented key and count the request against its daily quota.
pub async fn verify_key(
    State(state): State<AppState>,
    Json(req): Json<VerifyKeyRequest>,
) -> AppResult<impl IntoResponse> {
    let check = keys::check_and_record_usage(&state, &req.api_key, &req.endpoint).await?;
    Ok(Json(DataResponse { data: check }))
}

/// PUT /keys/{id}/quota
pub async fn update_quota(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(limits): Json<QuotaLimits>,
) -> AppResult<impl IntoResponse> {
    let updated = ApiKeyRepo::update_quota(&state.pool, id, &limits).await?;
    if !updated {
        return Err(CoreError::not_found("ApiKey", id.to_string()).into());
    }
    Ok(Json(MessageResponse {
        message: "Quota updated".to_string(),
    }))
}

/// POST /keys/{id}/rotate
///
/// `{id}` is the consumer username. The consumer must already exist on the
/// gateway.
pub async fn rotate_key(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let issued = keys::rotate_key(&state, &id, None).await?;
    Ok(Json(DataResponse { data: issued }))
}
