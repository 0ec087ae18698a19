//! API key and quota entities. Usage rows are written and aggregated through
//! the repository only.
//!
//! Keys are stored as SHA-256 hashes only; the hash is additionally excluded
//! from serialization so it can never leak through a read endpoint.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use apimgr_core::types::Timestamp;

/// A stored API key. `key_hash` never appears in JSON output.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ApiKey {
    pub id: Uuid,
    #[serde(skip_serializing)]
    pub key_hash: String,
    pub owner: String,
    pub created_at: Timestamp,
    pub expires_at: Timestamp,
    pub is_active: bool,
}

/// Per-key request ceilings. One-to-one with [`ApiKey`].
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Quota {
    pub id: Uuid,
    pub api_key_id: Uuid,
    pub requests_per_minute: i32,
    pub requests_per_hour: i32,
    pub requests_per_day: i32,
    pub last_reset: Timestamp,
}

/// DTO for inserting a new API key row.
#[derive(Debug, Clone)]
pub struct CreateApiKey {
    pub key_hash: String,
    pub owner: String,
    pub expires_at: Timestamp,
}

/// DTO for the quota attached to a new key.
#[derive(Debug, Clone, Deserialize)]
pub struct QuotaLimits {
    pub requests_per_minute: i32,
    pub requests_per_hour: i32,
    pub requests_per_day: i32,
}

impl QuotaLimits {
    /// The ceilings applied when an issuance request does not name its own.
    pub fn standard() -> Self {
        Self {
            requests_per_minute: 60,
            requests_per_hour: 1000,
            requests_per_day: 10_000,
        }
    }
}

/// Key metadata joined with its quota, as returned by list endpoints.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ApiKeyWithQuota {
    pub id: Uuid,
    pub owner: String,
    pub created_at: Timestamp,
    pub expires_at: Timestamp,
    pub is_active: bool,
    pub requests_per_minute: i32,
    pub requests_per_hour: i32,
    pub requests_per_day: i32,
}
