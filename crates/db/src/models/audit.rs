//! Audit log entities. Append-only: rows are never updated or deleted by the
//! application, so there is no update DTO and no `updated_at` column.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use apimgr_core::types::{DbId, Timestamp};

/// A single audit log entry. Immutable once created.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AuditLog {
    pub id: DbId,
    pub timestamp: Timestamp,
    pub actor: String,
    pub action: String,
    pub resource: String,
    pub details: Option<serde_json::Value>,
}

/// DTO for inserting a new audit log entry.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateAuditLog {
    pub actor: String,
    pub action: String,
    pub resource: String,
    pub details: Option<serde_json::Value>,
}
