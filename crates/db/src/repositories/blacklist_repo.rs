//! Repository for the `blacklist_entries` table.
//!
//! "Valid" everywhere below means `expires_at IS NULL OR expires_at > now()`.
//! Expired rows stay in the table for audit but are invisible to reads and
//! to the set pushed to the gateway.

use sqlx::PgPool;

use crate::models::blacklist::{BlacklistEntry, CreateBlacklistEntry};

/// Column list for SELECT queries.
const COLUMNS: &str = "id, ip_or_cidr, reason, added_by, added_at, expires_at";

pub struct BlacklistRepo;

impl BlacklistRepo {
    /// All valid entries, newest first.
    pub async fn list_valid(pool: &PgPool) -> Result<Vec<BlacklistEntry>, sqlx::Error> {
        sqlx::query_as::<_, BlacklistEntry>(&format!(
            "SELECT {COLUMNS} FROM blacklist_entries \
             WHERE expires_at IS NULL OR expires_at > now() \
             ORDER BY added_at DESC"
        ))
        .fetch_all(pool)
        .await
    }

    /// Find a valid entry by exact IP/CIDR string match.
    pub async fn find_valid_by_ip(
        pool: &PgPool,
        ip_or_cidr: &str,
    ) -> Result<Option<BlacklistEntry>, sqlx::Error> {
        sqlx::query_as::<_, BlacklistEntry>(&format!(
            "SELECT {COLUMNS} FROM blacklist_entries \
             WHERE ip_or_cidr = $1 AND (expires_at IS NULL OR expires_at > now()) \
             LIMIT 1"
        ))
        .bind(ip_or_cidr)
        .fetch_optional(pool)
        .await
    }

    /// Insert a new entry.
    pub async fn insert(
        pool: &PgPool,
        entry: &CreateBlacklistEntry,
    ) -> Result<BlacklistEntry, sqlx::Error> {
        sqlx::query_as::<_, BlacklistEntry>(&format!(
            "INSERT INTO blacklist_entries (ip_or_cidr, reason, added_by, expires_at) \
             VALUES ($1, $2, $3, $4) RETURNING {COLUMNS}"
        ))
        .bind(&entry.ip_or_cidr)
        .bind(&entry.reason)
        .bind(&entry.added_by)
        .bind(entry.expires_at)
        .fetch_one(pool)
        .await
    }

    /// Delete the valid entry(ies) matching an IP/CIDR. Expired rows are left
    /// untouched so the audit trail survives removals.
    ///
    /// Returns the number of rows deleted (0 when the IP was not present).
    pub async fn delete_valid_by_ip(pool: &PgPool, ip_or_cidr: &str) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "DELETE FROM blacklist_entries \
             WHERE ip_or_cidr = $1 AND (expires_at IS NULL OR expires_at > now())",
        )
        .bind(ip_or_cidr)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }

    /// Distinct valid IP/CIDR strings, for the full-replace gateway push.
    pub async fn valid_ips(pool: &PgPool) -> Result<Vec<String>, sqlx::Error> {
        sqlx::query_scalar::<_, String>(
            "SELECT DISTINCT ip_or_cidr FROM blacklist_entries \
             WHERE expires_at IS NULL OR expires_at > now() \
             ORDER BY ip_or_cidr",
        )
        .fetch_all(pool)
        .await
    }

    /// Total row count including expired entries (used by tests to check
    /// that expiry filtering never deletes anything).
    pub async fn count_all(pool: &PgPool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*)::BIGINT FROM blacklist_entries")
            .fetch_one(pool)
            .await
    }
}
