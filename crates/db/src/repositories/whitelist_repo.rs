//! Repository for the `whitelist_entries` table.
//!
//! Same validity rules as the blacklist repository, with every query scoped
//! to a single route.

use sqlx::PgPool;

use crate::models::whitelist::{CreateWhitelistEntry, WhitelistEntry};

/// Column list for SELECT queries.
const COLUMNS: &str = "id, route_id, ip_cidr, reason, added_by, added_at, expires_at";

pub struct WhitelistRepo;

impl WhitelistRepo {
    /// All valid entries for a route, newest first.
    pub async fn list_valid_for_route(
        pool: &PgPool,
        route_id: &str,
    ) -> Result<Vec<WhitelistEntry>, sqlx::Error> {
        sqlx::query_as::<_, WhitelistEntry>(&format!(
            "SELECT {COLUMNS} FROM whitelist_entries \
             WHERE route_id = $1 AND (expires_at IS NULL OR expires_at > now()) \
             ORDER BY added_at DESC"
        ))
        .bind(route_id)
        .fetch_all(pool)
        .await
    }

    /// Find a valid entry by exact IP/CIDR match within a route scope.
    pub async fn find_valid_by_ip(
        pool: &PgPool,
        route_id: &str,
        ip_cidr: &str,
    ) -> Result<Option<WhitelistEntry>, sqlx::Error> {
        sqlx::query_as::<_, WhitelistEntry>(&format!(
            "SELECT {COLUMNS} FROM whitelist_entries \
             WHERE route_id = $1 AND ip_cidr = $2 \
               AND (expires_at IS NULL OR expires_at > now()) \
             LIMIT 1"
        ))
        .bind(route_id)
        .bind(ip_cidr)
        .fetch_optional(pool)
        .await
    }

    /// Insert a new entry.
    pub async fn insert(
        pool: &PgPool,
        entry: &CreateWhitelistEntry,
    ) -> Result<WhitelistEntry, sqlx::Error> {
        sqlx::query_as::<_, WhitelistEntry>(&format!(
            "INSERT INTO whitelist_entries (route_id, ip_cidr, reason, added_by, expires_at) \
             VALUES ($1, $2, $3, $4, $5) RETURNING {COLUMNS}"
        ))
        .bind(&entry.route_id)
        .bind(&entry.ip_cidr)
        .bind(&entry.reason)
        .bind(&entry.added_by)
        .bind(entry.expires_at)
        .fetch_one(pool)
        .await
    }

    /// Delete the valid entry(ies) matching an IP/CIDR within a route scope.
    ///
    /// Returns the number of rows deleted (0 when the IP was not present).
    pub async fn delete_valid_by_ip(
        pool: &PgPool,
        route_id: &str,
        ip_cidr: &str,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "DELETE FROM whitelist_entries \
             WHERE route_id = $1 AND ip_cidr = $2 \
               AND (expires_at IS NULL OR expires_at > now())",
        )
        .bind(route_id)
        .bind(ip_cidr)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }

    /// Distinct valid IP/CIDR strings for a route, for the gateway push.
    pub async fn valid_ips_for_route(
        pool: &PgPool,
        route_id: &str,
    ) -> Result<Vec<String>, sqlx::Error> {
        sqlx::query_scalar::<_, String>(
            "SELECT DISTINCT ip_cidr FROM whitelist_entries \
             WHERE route_id = $1 AND (expires_at IS NULL OR expires_at > now()) \
             ORDER BY ip_cidr",
        )
        .bind(route_id)
        .fetch_all(pool)
        .await
    }

    /// Total row count for a route including expired entries.
    pub async fn count_for_route(pool: &PgPool, route_id: &str) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*)::BIGINT FROM whitelist_entries WHERE route_id = $1",
        )
        .bind(route_id)
        .fetch_one(pool)
        .await
    }
}
