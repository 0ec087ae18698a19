//! Audit trail writer.
//!
//! Every recorded event is traced; database persistence is additionally
//! controlled by the `AUDIT_LOG_DB_WRITE` flag. A failed database write is
//! logged but never fails the mutation that produced the event — the audit
//! trail is an observer of changes, not a participant in them.

use apimgr_core::audit::{AuditAction, AuditResource};
use apimgr_db::models::audit::CreateAuditLog;
use apimgr_db::repositories::AuditLogRepo;
use apimgr_db::DbPool;

/// Default actor recorded when the caller did not identify themselves.
pub const SYSTEM_ACTOR: &str = "System";

#[derive(Clone)]
pub struct AuditRecorder {
    pool: DbPool,
    db_write: bool,
}

impl AuditRecorder {
    pub fn new(pool: DbPool, db_write: bool) -> Self {
        Self { pool, db_write }
    }

    /// Record one audit event.
    ///
    /// `actor` falls back to [`SYSTEM_ACTOR`] when `None`.
    pub async fn record(
        &self,
        actor: Option<&str>,
        action: AuditAction,
        resource: AuditResource,
        details: serde_json::Value,
    ) {
        let actor = actor.unwrap_or(SYSTEM_ACTOR);

        tracing::info!(
            actor,
            action = %action,
            resource = %resource,
            details = %details,
            "Audit event"
        );

        if !self.db_write {
            return;
        }

        let entry = CreateAuditLog {
            actor: actor.to_string(),
            action: action.as_str().to_string(),
            resource: resource.as_str().to_string(),
            details: Some(details),
        };

        if let Err(e) = AuditLogRepo::insert(&self.pool, &entry).await {
            tracing::warn!(error = %e, "Failed to persist audit log entry");
        }
    }
}
