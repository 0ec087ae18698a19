//! API key issuance, rotation, and the periodic lifecycle check.
//!
//! A key exists in three places that must stay consistent: the gateway
//! consumer's `key-auth` plugin (plaintext, the gateway needs it to match
//! requests), the secrets store (plaintext, recoverable by operators), and
//! our database (SHA-256 hash plus quota). Issuance writes all three;
//! rotation replaces the plaintext everywhere and extends the validity
//! window. The plaintext is returned to the caller exactly once.

use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use apimgr_core::api_keys::{self, DEFAULT_VALIDITY_DAYS};
use apimgr_core::audit::{AuditAction, AuditResource};
use apimgr_core::error::CoreError;
use apimgr_core::types::Timestamp;
use apimgr_db::models::api_key::{CreateApiKey, QuotaLimits};
use apimgr_db::repositories::ApiKeyRepo;
use apimgr_gateway::types::{Consumer, PluginMap};

use crate::error::AppResult;
use crate::secrets::api_key_path;
use crate::state::AppState;

/// Shown alongside the plaintext on issuance and rotation.
pub const ONE_TIME_DISCLOSURE: &str =
    "Please save this key immediately. It will not be shown again.";

const KEY_AUTH_PLUGIN: &str = "key-auth";
const LIMIT_COUNT_PLUGIN: &str = "limit-count";

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct CreateKeyRequest {
    #[serde(alias = "consumerName")]
    pub consumer_name: String,
    #[serde(default = "QuotaLimits::standard")]
    pub quota: QuotaLimits,
    /// Validity in days; defaults to the standard window.
    #[serde(alias = "validityDays")]
    pub validity_days: Option<i64>,
    pub requested_by: Option<String>,
}

/// Issuance/rotation response. The only place the plaintext ever appears.
#[derive(Debug, Serialize)]
pub struct KeyIssued {
    pub id: Option<Uuid>,
    pub owner: String,
    pub api_key: String,
    pub expires_at: Timestamp,
    pub message: &'static str,
}

// ---------------------------------------------------------------------------
// Issuance
// ---------------------------------------------------------------------------

/// Mint a key for a consumer: store the plaintext in the secrets store,
/// provision the gateway consumer with `key-auth` and `limit-count`, persist
/// the hash plus quota, and disclose the plaintext once.
pub async fn create_key(state: &AppState, req: &CreateKeyRequest) -> AppResult<KeyIssued> {
    let owner = req.consumer_name.trim();
    if owner.is_empty() {
        return Err(CoreError::Validation("consumer_name is required".to_string()).into());
    }

    let generated = api_keys::generate_api_key();
    let validity = req.validity_days.unwrap_or(DEFAULT_VALIDITY_DAYS);
    let expires_at = Utc::now() + Duration::days(validity);

    let version = state
        .secrets
        .store(&api_key_path(owner), &generated.plaintext)
        .await
        .map_err(|e| CoreError::Internal(format!("secrets store write failed: {e}")))?;
    tracing::debug!(owner, version, "API key plaintext stored in secrets store");

    // Gateway consumer carries the plaintext in key-auth and the per-minute
    // ceiling in limit-count; hour/day ceilings are enforced locally.
    let consumer = build_keyed_consumer(owner, &generated.plaintext, req.quota.requests_per_minute);
    state.gateway.put_consumer(owner, &consumer).await?;

    let stored = ApiKeyRepo::insert_with_quota(
        &state.pool,
        &CreateApiKey {
            key_hash: generated.hash,
            owner: owner.to_string(),
            expires_at,
        },
        &req.quota,
    )
    .await?;

    state
        .audit
        .record(
            req.requested_by.as_deref(),
            AuditAction::Create,
            AuditResource::ApiKey,
            serde_json::json!({ "owner": owner, "expires_at": expires_at }),
        )
        .await;

    Ok(KeyIssued {
        id: Some(stored.id),
        owner: owner.to_string(),
        api_key: generated.plaintext,
        expires_at,
        message: ONE_TIME_DISCLOSURE,
    })
}

// ---------------------------------------------------------------------------
// Rotation
// ---------------------------------------------------------------------------

/// Rotate the key of an existing gateway consumer.
///
/// The consumer must already exist on the gateway; rotation never creates
/// one. The stored hash and expiry are updated when a database row exists
/// for the owner, otherwise only the gateway and secrets store change.
pub async fn rotate_key(
    state: &AppState,
    consumer_name: &str,
    requested_by: Option<&str>,
) -> AppResult<KeyIssued> {
    let mut consumer = state
        .gateway
        .get_consumer(consumer_name)
        .await?
        .ok_or_else(|| CoreError::not_found("Consumer", consumer_name))?;

    let generated = api_keys::generate_api_key();
    let expires_at = Utc::now() + Duration::days(DEFAULT_VALIDITY_DAYS);

    let version = state
        .secrets
        .store(&api_key_path(consumer_name), &generated.plaintext)
        .await
        .map_err(|e| CoreError::Internal(format!("secrets store write failed: {e}")))?;
    tracing::debug!(owner = consumer_name, version, "Rotated key stored in secrets store");

    set_key_auth(&mut consumer, &generated.plaintext);
    state.gateway.put_consumer(consumer_name, &consumer).await?;

    let id = match ApiKeyRepo::find_active_by_owner(&state.pool, consumer_name).await? {
        Some(row) => {
            ApiKeyRepo::update_hash_and_expiry(&state.pool, row.id, &generated.hash, expires_at)
                .await?;
            Some(row.id)
        }
        None => {
            tracing::warn!(
                owner = consumer_name,
                "Rotated a gateway consumer with no stored key row"
            );
            None
        }
    };

    state
        .audit
        .record(
            requested_by,
            AuditAction::ApiKeyRotation,
            AuditResource::ApiKey,
            serde_json::json!({ "owner": consumer_name, "expires_at": expires_at }),
        )
        .await;

    Ok(KeyIssued {
        id,
        owner: consumer_name.to_string(),
        api_key: generated.plaintext,
        expires_at,
        message: ONE_TIME_DISCLOSURE,
    })
}

// ---------------------------------------------------------------------------
// Quota enforcement
// ---------------------------------------------------------------------------

/// Why a presented key was rejected, for the verification response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyRejection {
    UnknownKey,
    Expired,
    QuotaExceeded,
}

/// Outcome of verifying a presented key against its stored quota.
#[derive(Debug, Serialize)]
pub struct UsageCheck {
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rejection: Option<KeyRejection>,
}

impl UsageCheck {
    fn accepted() -> Self {
        Self { valid: true, rejection: None }
    }

    fn rejected(reason: KeyRejection) -> Self {
        Self { valid: false, rejection: Some(reason) }
    }
}

/// Verify a presented plaintext key and, when it passes, count the request
/// against its daily ceiling. The key never touches the database in
/// plaintext; lookup goes through the stored hash.
pub async fn check_and_record_usage(
    state: &AppState,
    presented_key: &str,
    endpoint: &str,
) -> AppResult<UsageCheck> {
    let hash = api_keys::hash_api_key(presented_key);
    let Some(key) = ApiKeyRepo::find_active_by_hash(&state.pool, &hash).await? else {
        return Ok(UsageCheck::rejected(KeyRejection::UnknownKey));
    };
    if api_keys::is_expired(key.expires_at, Utc::now()) {
        return Ok(UsageCheck::rejected(KeyRejection::Expired));
    }
    let Some(quota) = ApiKeyRepo::find_quota(&state.pool, key.id).await? else {
        return Ok(UsageCheck::rejected(KeyRejection::UnknownKey));
    };

    let today = ApiKeyRepo::usage_today(&state.pool, key.id).await?;
    if today >= i64::from(quota.requests_per_day) {
        tracing::debug!(owner = %key.owner, today, "Daily quota exhausted");
        return Ok(UsageCheck::rejected(KeyRejection::QuotaExceeded));
    }

    ApiKeyRepo::record_usage(&state.pool, key.id, endpoint).await?;
    Ok(UsageCheck::accepted())
}

// ---------------------------------------------------------------------------
// Periodic lifecycle check
// ---------------------------------------------------------------------------

/// Walk all active keys: rotate the expired ones, warn on the near-expiring
/// ones. Called from the background job; per-key failures are logged and do
/// not stop the sweep.
pub async fn check_and_rotate(state: &AppState) -> AppResult<()> {
    let now = Utc::now();
    let keys = ApiKeyRepo::list_active(&state.pool).await?;

    for key in keys {
        if api_keys::is_expired(key.expires_at, now) {
            tracing::info!(owner = %key.owner, expired_at = %key.expires_at, "Rotating expired API key");
            if let Err(e) = rotate_key(state, &key.owner, None).await {
                tracing::warn!(owner = %key.owner, error = %e, "Automatic key rotation failed");
            }
        } else if api_keys::is_near_expiry(key.expires_at, now) {
            tracing::warn!(
                owner = %key.owner,
                expires_at = %key.expires_at,
                "API key expires within the warning window"
            );
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn build_keyed_consumer(owner: &str, plaintext: &str, per_minute: i32) -> Consumer {
    let mut plugins = PluginMap::new();
    plugins.insert(
        KEY_AUTH_PLUGIN.to_string(),
        serde_json::json!({ "key": plaintext }),
    );
    plugins.insert(
        LIMIT_COUNT_PLUGIN.to_string(),
        serde_json::json!({
            "count": per_minute,
            "time_window": 60,
            "key": "consumer_name",
        }),
    );
    Consumer {
        username: owner.to_string(),
        plugins: Some(plugins),
        ..Default::default()
    }
}

fn set_key_auth(consumer: &mut Consumer, plaintext: &str) {
    let plugins = consumer.plugins.get_or_insert_with(PluginMap::new);
    plugins.insert(
        KEY_AUTH_PLUGIN.to_string(),
        serde_json::json!({ "key": plaintext }),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keyed_consumer_carries_key_auth_and_limit_count() {
        let consumer = build_keyed_consumer("svc-billing", "mk_deadbeef", 120);
        let plugins = consumer.plugins.as_ref().unwrap();
        assert_eq!(plugins[KEY_AUTH_PLUGIN]["key"], "mk_deadbeef");
        assert_eq!(plugins[LIMIT_COUNT_PLUGIN]["count"], 120);
        assert_eq!(plugins[LIMIT_COUNT_PLUGIN]["time_window"], 60);
    }

    #[test]
    fn set_key_auth_preserves_other_plugins() {
        let mut consumer = build_keyed_consumer("svc-billing", "mk_old", 60);
        set_key_auth(&mut consumer, "mk_new");
        let plugins = consumer.plugins.as_ref().unwrap();
        assert_eq!(plugins[KEY_AUTH_PLUGIN]["key"], "mk_new");
        assert!(plugins.contains_key(LIMIT_COUNT_PLUGIN));
    }

    #[test]
    fn create_key_request_defaults_quota() {
        let req: CreateKeyRequest =
            serde_json::from_str(r#"{"consumer_name": "svc-billing"}"#).unwrap();
        assert_eq!(req.quota.requests_per_minute, 60);
        assert!(req.validity_days.is_none());
    }
}
