//! Per-route IP/CIDR whitelist entities.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use apimgr_core::types::{DbId, Timestamp};

/// A single whitelist row, scoped to one gateway route.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct WhitelistEntry {
    pub id: DbId,
    pub route_id: String,
    pub ip_cidr: String,
    pub reason: Option<String>,
    pub added_by: Option<String>,
    pub added_at: Timestamp,
    pub expires_at: Option<Timestamp>,
}

/// DTO for inserting a new whitelist entry.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateWhitelistEntry {
    pub route_id: String,
    pub ip_cidr: String,
    pub reason: Option<String>,
    pub added_by: Option<String>,
    pub expires_at: Option<Timestamp>,
}
