//! Repository for the `api_keys`, `quotas`, and `usage_records` tables.

use sqlx::PgPool;
use uuid::Uuid;

use apimgr_core::types::Timestamp;

use crate::models::api_key::{ApiKey, ApiKeyWithQuota, CreateApiKey, Quota, QuotaLimits};

/// Column list for `api_keys` SELECT queries.
const KEY_COLUMNS: &str = "id, key_hash, owner, created_at, expires_at, is_active";

pub struct ApiKeyRepo;

impl ApiKeyRepo {
    /// Insert a new key and its quota inside one transaction.
    ///
    /// The quota row is owned by the key (cascade delete), so a failure in the
    /// second insert leaves no orphaned key behind.
    pub async fn insert_with_quota(
        pool: &PgPool,
        key: &CreateApiKey,
        limits: &QuotaLimits,
    ) -> Result<ApiKey, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let created = sqlx::query_as::<_, ApiKey>(&format!(
            "INSERT INTO api_keys (id, key_hash, owner, expires_at, is_active) \
             VALUES ($1, $2, $3, $4, TRUE) RETURNING {KEY_COLUMNS}"
        ))
        .bind(Uuid::new_v4())
        .bind(&key.key_hash)
        .bind(&key.owner)
        .bind(key.expires_at)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query(
            "INSERT INTO quotas \
             (id, api_key_id, requests_per_minute, requests_per_hour, requests_per_day) \
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(Uuid::new_v4())
        .bind(created.id)
        .bind(limits.requests_per_minute)
        .bind(limits.requests_per_hour)
        .bind(limits.requests_per_day)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(created)
    }

    /// Find the active key for an owner, if any.
    pub async fn find_active_by_owner(
        pool: &PgPool,
        owner: &str,
    ) -> Result<Option<ApiKey>, sqlx::Error> {
        sqlx::query_as::<_, ApiKey>(&format!(
            "SELECT {KEY_COLUMNS} FROM api_keys \
             WHERE owner = $1 AND is_active ORDER BY created_at DESC LIMIT 1"
        ))
        .bind(owner)
        .fetch_optional(pool)
        .await
    }

    /// Find the active key matching a presented hash, if any.
    pub async fn find_active_by_hash(
        pool: &PgPool,
        key_hash: &str,
    ) -> Result<Option<ApiKey>, sqlx::Error> {
        sqlx::query_as::<_, ApiKey>(&format!(
            "SELECT {KEY_COLUMNS} FROM api_keys WHERE key_hash = $1 AND is_active"
        ))
        .bind(key_hash)
        .fetch_optional(pool)
        .await
    }

    /// The quota row attached to a key, if any.
    pub async fn find_quota(pool: &PgPool, api_key_id: Uuid) -> Result<Option<Quota>, sqlx::Error> {
        sqlx::query_as::<_, Quota>(
            "SELECT id, api_key_id, requests_per_minute, requests_per_hour, requests_per_day, \
             last_reset FROM quotas WHERE api_key_id = $1",
        )
        .bind(api_key_id)
        .fetch_optional(pool)
        .await
    }

    /// All active keys (for the periodic expiration check).
    pub async fn list_active(pool: &PgPool) -> Result<Vec<ApiKey>, sqlx::Error> {
        sqlx::query_as::<_, ApiKey>(&format!(
            "SELECT {KEY_COLUMNS} FROM api_keys WHERE is_active ORDER BY expires_at"
        ))
        .fetch_all(pool)
        .await
    }

    /// Key metadata joined with quotas, for list endpoints. Never exposes
    /// `key_hash`.
    pub async fn list_with_quotas(pool: &PgPool) -> Result<Vec<ApiKeyWithQuota>, sqlx::Error> {
        sqlx::query_as::<_, ApiKeyWithQuota>(
            "SELECT k.id, k.owner, k.created_at, k.expires_at, k.is_active, \
                    q.requests_per_minute, q.requests_per_hour, q.requests_per_day \
             FROM api_keys k JOIN quotas q ON q.api_key_id = k.id \
             ORDER BY k.created_at DESC",
        )
        .fetch_all(pool)
        .await
    }

    /// Replace the stored hash and extend the validity window after a rotation.
    pub async fn update_hash_and_expiry(
        pool: &PgPool,
        id: Uuid,
        key_hash: &str,
        expires_at: Timestamp,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE api_keys SET key_hash = $2, expires_at = $3, is_active = TRUE WHERE id = $1",
        )
        .bind(id)
        .bind(key_hash)
        .bind(expires_at)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Update the quota attached to a key. Returns false if the key has no
    /// quota row.
    pub async fn update_quota(
        pool: &PgPool,
        api_key_id: Uuid,
        limits: &QuotaLimits,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE quotas SET requests_per_minute = $2, requests_per_hour = $3, \
             requests_per_day = $4 WHERE api_key_id = $1",
        )
        .bind(api_key_id)
        .bind(limits.requests_per_minute)
        .bind(limits.requests_per_hour)
        .bind(limits.requests_per_day)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Total requests recorded against a key today (UTC).
    pub async fn usage_today(pool: &PgPool, api_key_id: Uuid) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COALESCE(SUM(request_count), 0) FROM usage_records \
             WHERE api_key_id = $1 AND timestamp::date = (now() AT TIME ZONE 'utc')::date",
        )
        .bind(api_key_id)
        .fetch_one(pool)
        .await
    }

    /// Accumulate one request against a key/endpoint pair.
    pub async fn record_usage(
        pool: &PgPool,
        api_key_id: Uuid,
        endpoint: &str,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO usage_records (id, api_key_id, endpoint) VALUES ($1, $2, $3)",
        )
        .bind(Uuid::new_v4())
        .bind(api_key_id)
        .bind(endpoint)
        .execute(pool)
        .await?;
        Ok(())
    }
}
