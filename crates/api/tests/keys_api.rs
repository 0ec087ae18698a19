//! Integration tests for API key issuance, rotation, and quota management.

mod common;

use axum::http::StatusCode;
use chrono::{Duration, Utc};
use common::{body_json, get, post_json, put_json};
use serde_json::json;
use sqlx::PgPool;

use apimgr_core::api_keys::hash_api_key;
use apimgr_db::models::api_key::{CreateApiKey, QuotaLimits};
use apimgr_db::repositories::{ApiKeyRepo, AuditLogRepo};
use apimgr_gateway::GatewayAdmin;

// ---------------------------------------------------------------------------
// Test: issuing a key provisions gateway, database, and audit trail
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn create_key_provisions_everything(pool: PgPool) {
    let app = common::build_test_app(pool.clone());

    let response = post_json(
        app.router.clone(),
        "/api/keys",
        json!({ "consumer_name": "payment-gateway" }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    let plaintext = json["data"]["api_key"].as_str().unwrap().to_string();
    assert!(plaintext.starts_with("mk_"));
    assert_eq!(
        json["data"]["message"],
        "Please save this key immediately. It will not be shown again."
    );
    // The stored hash never appears in a response.
    assert!(json["data"].get("key_hash").is_none());

    // Gateway consumer carries the plaintext in key-auth plus rate limits.
    let consumer = app
        .state
        .gateway
        .get_consumer("payment-gateway")
        .await
        .unwrap()
        .expect("consumer should exist on the gateway");
    let plugins = consumer.plugins.unwrap();
    assert_eq!(plugins["key-auth"]["key"], plaintext.as_str());
    assert_eq!(plugins["limit-count"]["time_window"], 60);

    // Database row holds the SHA-256 hash, not the plaintext.
    let row = ApiKeyRepo::find_active_by_owner(&pool, "payment-gateway")
        .await
        .unwrap()
        .expect("key row should exist");
    assert_eq!(row.key_hash, hash_api_key(&plaintext));
    assert!(row.expires_at > Utc::now());

    let audits = AuditLogRepo::count_by_action_resource(&pool, "Create", "ApiKey")
        .await
        .unwrap();
    assert_eq!(audits, 1);
}

// ---------------------------------------------------------------------------
// Test: the list endpoint exposes metadata and quotas only
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn list_keys_never_exposes_key_material(pool: PgPool) {
    let app = common::build_test_app(pool.clone());

    post_json(
        app.router.clone(),
        "/api/keys",
        json!({
            "consumer_name": "svc-billing",
            "quota": { "requests_per_minute": 10, "requests_per_hour": 100, "requests_per_day": 1000 }
        }),
    )
    .await;

    let response = get(app.router.clone(), "/api/keys").await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let keys = json["data"].as_array().unwrap();
    assert_eq!(keys.len(), 1);
    assert_eq!(keys[0]["owner"], "svc-billing");
    assert_eq!(keys[0]["requests_per_minute"], 10);
    assert!(keys[0].get("key_hash").is_none());
    assert!(keys[0].get("api_key").is_none());
}

// ---------------------------------------------------------------------------
// Test: rotation replaces the key everywhere
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn rotation_replaces_key_everywhere(pool: PgPool) {
    let app = common::build_test_app(pool.clone());

    let response = post_json(
        app.router.clone(),
        "/api/keys",
        json!({ "consumer_name": "svc-orders" }),
    )
    .await;
    let old_plaintext = body_json(response).await["data"]["api_key"]
        .as_str()
        .unwrap()
        .to_string();

    let response = post_json(app.router.clone(), "/api/keys/svc-orders/rotate", json!({})).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let new_plaintext = json["data"]["api_key"].as_str().unwrap().to_string();
    assert_ne!(new_plaintext, old_plaintext);
    assert_eq!(
        json["data"]["message"],
        "Please save this key immediately. It will not be shown again."
    );

    // Gateway and database both reflect the new key.
    let consumer = app
        .state
        .gateway
        .get_consumer("svc-orders")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(
        consumer.plugins.unwrap()["key-auth"]["key"],
        new_plaintext.as_str()
    );

    let row = ApiKeyRepo::find_active_by_owner(&pool, "svc-orders")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(row.key_hash, hash_api_key(&new_plaintext));

    let rotations = AuditLogRepo::count_by_action_resource(&pool, "ApiKeyRotation", "ApiKey")
        .await
        .unwrap();
    assert_eq!(rotations, 1);
}

// ---------------------------------------------------------------------------
// Test: rotating an unknown consumer is a 404 with no audit entry
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn rotation_of_unknown_consumer_is_not_found(pool: PgPool) {
    let app = common::build_test_app(pool.clone());

    let response = post_json(app.router.clone(), "/api/keys/ghost/rotate", json!({})).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_json(response).await;
    assert!(json["error"].as_str().unwrap().contains("not found"));

    let audits = AuditLogRepo::list_recent(&pool, 10).await.unwrap();
    assert!(audits.is_empty());
}

// ---------------------------------------------------------------------------
// Test: quota updates by key id
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn quota_update_by_id(pool: PgPool) {
    let app = common::build_test_app(pool.clone());

    let response = post_json(
        app.router.clone(),
        "/api/keys",
        json!({ "consumer_name": "svc-search" }),
    )
    .await;
    let id = body_json(response).await["data"]["id"]
        .as_str()
        .unwrap()
        .to_string();

    let response = put_json(
        app.router.clone(),
        &format!("/api/keys/{id}/quota"),
        json!({ "requests_per_minute": 5, "requests_per_hour": 50, "requests_per_day": 500 }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let keys = ApiKeyRepo::list_with_quotas(&pool).await.unwrap();
    assert_eq!(keys[0].requests_per_minute, 5);
    assert_eq!(keys[0].requests_per_day, 500);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn quota_update_for_unknown_key_is_not_found(pool: PgPool) {
    let app = common::build_test_app(pool.clone());

    let response = put_json(
        app.router.clone(),
        &format!("/api/keys/{}/quota", uuid::Uuid::new_v4()),
        json!({ "requests_per_minute": 5, "requests_per_hour": 50, "requests_per_day": 500 }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Test: key verification accumulates usage and enforces the daily ceiling
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn verify_records_usage_until_the_daily_ceiling(pool: PgPool) {
    let app = common::build_test_app(pool.clone());

    let response = post_json(
        app.router.clone(),
        "/api/keys",
        json!({
            "consumer_name": "svc-metering",
            "quota": { "requests_per_minute": 60, "requests_per_hour": 100, "requests_per_day": 2 }
        }),
    )
    .await;
    let plaintext = body_json(response).await["data"]["api_key"]
        .as_str()
        .unwrap()
        .to_string();

    // Two requests fit the daily ceiling, the third is rejected.
    for _ in 0..2 {
        let response = post_json(
            app.router.clone(),
            "/api/keys/verify",
            json!({ "api_key": plaintext, "endpoint": "/v1/orders" }),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["data"]["valid"], true);
    }

    let response = post_json(
        app.router.clone(),
        "/api/keys/verify",
        json!({ "api_key": plaintext, "endpoint": "/v1/orders" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["valid"], false);
    assert_eq!(json["data"]["rejection"], "quota_exceeded");

    let key = ApiKeyRepo::find_active_by_owner(&pool, "svc-metering")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(ApiKeyRepo::usage_today(&pool, key.id).await.unwrap(), 2);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn verify_rejects_unknown_and_expired_keys(pool: PgPool) {
    let app = common::build_test_app(pool.clone());

    let response = post_json(
        app.router.clone(),
        "/api/keys/verify",
        json!({ "api_key": "mk_nope" }),
    )
    .await;
    assert_eq!(body_json(response).await["data"]["rejection"], "unknown_key");

    let stale = ApiKeyRepo::insert_with_quota(
        &pool,
        &CreateApiKey {
            key_hash: hash_api_key("mk_stale"),
            owner: "svc-legacy".to_string(),
            expires_at: Utc::now() - Duration::days(1),
        },
        &QuotaLimits::standard(),
    )
    .await
    .unwrap();

    let response = post_json(
        app.router.clone(),
        "/api/keys/verify",
        json!({ "api_key": "mk_stale" }),
    )
    .await;
    let json = body_json(response).await;
    assert_eq!(json["data"]["valid"], false);
    assert_eq!(json["data"]["rejection"], "expired");
    assert_eq!(ApiKeyRepo::usage_today(&pool, stale.id).await.unwrap(), 0);
}

// ---------------------------------------------------------------------------
// Test: the lifecycle sweep rotates expired keys only
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn lifecycle_sweep_rotates_expired_keys(pool: PgPool) {
    let app = common::build_test_app(pool.clone());

    // An expired key whose consumer still exists on the gateway.
    let expired = ApiKeyRepo::insert_with_quota(
        &pool,
        &CreateApiKey {
            key_hash: hash_api_key("mk_stale"),
            owner: "svc-legacy".to_string(),
            expires_at: Utc::now() - Duration::days(1),
        },
        &QuotaLimits::standard(),
    )
    .await
    .unwrap();
    app.state
        .gateway
        .put_consumer(
            "svc-legacy",
            &apimgr_gateway::types::Consumer {
                username: "svc-legacy".to_string(),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    // A healthy key that must be left alone.
    let healthy = ApiKeyRepo::insert_with_quota(
        &pool,
        &CreateApiKey {
            key_hash: hash_api_key("mk_fresh"),
            owner: "svc-current".to_string(),
            expires_at: Utc::now() + Duration::days(60),
        },
        &QuotaLimits::standard(),
    )
    .await
    .unwrap();

    apimgr_api::keys::check_and_rotate(&app.state).await.unwrap();

    let rotated = ApiKeyRepo::find_active_by_owner(&pool, "svc-legacy")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(rotated.id, expired.id);
    assert_ne!(rotated.key_hash, expired.key_hash);
    assert!(rotated.expires_at > Utc::now());

    let untouched = ApiKeyRepo::find_active_by_owner(&pool, "svc-current")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(untouched.key_hash, healthy.key_hash);
    assert_eq!(untouched.expires_at, healthy.expires_at);
}
