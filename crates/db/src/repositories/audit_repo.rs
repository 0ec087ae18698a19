//! Repository for the append-only `audit_logs` table.

use sqlx::PgPool;

use crate::models::audit::{AuditLog, CreateAuditLog};

/// Column list for SELECT queries.
const COLUMNS: &str = "id, timestamp, actor, action, resource, details";

pub struct AuditLogRepo;

impl AuditLogRepo {
    /// Insert a single audit log entry.
    pub async fn insert(pool: &PgPool, entry: &CreateAuditLog) -> Result<AuditLog, sqlx::Error> {
        sqlx::query_as::<_, AuditLog>(&format!(
            "INSERT INTO audit_logs (actor, action, resource, details) \
             VALUES ($1, $2, $3, $4) RETURNING {COLUMNS}"
        ))
        .bind(&entry.actor)
        .bind(&entry.action)
        .bind(&entry.resource)
        .bind(&entry.details)
        .fetch_one(pool)
        .await
    }

    /// Most recent entries, newest first.
    pub async fn list_recent(pool: &PgPool, limit: i64) -> Result<Vec<AuditLog>, sqlx::Error> {
        sqlx::query_as::<_, AuditLog>(&format!(
            "SELECT {COLUMNS} FROM audit_logs ORDER BY timestamp DESC, id DESC LIMIT $1"
        ))
        .bind(limit.min(500))
        .fetch_all(pool)
        .await
    }

    /// Count entries matching an action/resource pair.
    pub async fn count_by_action_resource(
        pool: &PgPool,
        action: &str,
        resource: &str,
    ) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*)::BIGINT FROM audit_logs WHERE action = $1 AND resource = $2",
        )
        .bind(action)
        .bind(resource)
        .fetch_one(pool)
        .await
    }
}
