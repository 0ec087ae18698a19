//! Global IP/CIDR blacklist entities.
//!
//! The blacklist is gateway-global (not scoped to a route). Expired rows are
//! kept for audit and filtered out of every read by the repository layer.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use apimgr_core::types::{DbId, Timestamp};

/// A single blacklist row.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct BlacklistEntry {
    pub id: DbId,
    pub ip_or_cidr: String,
    pub reason: Option<String>,
    pub added_by: Option<String>,
    pub added_at: Timestamp,
    pub expires_at: Option<Timestamp>,
}

/// DTO for inserting a new blacklist entry.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateBlacklistEntry {
    pub ip_or_cidr: String,
    pub reason: Option<String>,
    pub added_by: Option<String>,
    pub expires_at: Option<Timestamp>,
}
