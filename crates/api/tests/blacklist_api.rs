//! Integration tests for the global blacklist endpoints and their gateway
//! synchronization.

mod common;

use axum::http::StatusCode;
use chrono::{Duration, Utc};
use common::{body_json, get, post_json};
use serde_json::json;
use sqlx::PgPool;

use apimgr_db::models::blacklist::CreateBlacklistEntry;
use apimgr_db::repositories::{AuditLogRepo, BlacklistRepo};

// ---------------------------------------------------------------------------
// Test: adding an IP persists it, pushes it, and audits it
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn add_persists_pushes_and_audits(pool: PgPool) {
    let app = common::build_test_app(pool.clone());

    let response = post_json(
        app.router.clone(),
        "/api/blacklist",
        json!({ "ipOrCidr": "192.168.1.200", "action": "add", "reason": "Suspicious activity" }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["message"], "IP 192.168.1.200 added successfully");

    // One persisted entry, visible through the read endpoint.
    let response = get(app.router.clone(), "/api/blacklist").await;
    let json = body_json(response).await;
    let entries = json["data"].as_array().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["ip_or_cidr"], "192.168.1.200");
    assert_eq!(entries[0]["reason"], "Suspicious activity");

    // The gateway received the full-replace push.
    assert_eq!(
        app.gateway.blacklist_snapshot().await,
        vec!["192.168.1.200".to_string()]
    );

    // Exactly one Create/Blacklist audit row.
    let audits = AuditLogRepo::count_by_action_resource(&pool, "Create", "Blacklist")
        .await
        .unwrap();
    assert_eq!(audits, 1);
}

// ---------------------------------------------------------------------------
// Test: adding the same IP twice is a no-op
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn duplicate_add_is_idempotent(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let body = json!({ "ip_or_cidr": "10.0.0.7", "action": "add" });

    let first = post_json(app.router.clone(), "/api/blacklist", body.clone()).await;
    assert_eq!(first.status(), StatusCode::OK);
    let second = post_json(app.router.clone(), "/api/blacklist", body).await;
    assert_eq!(second.status(), StatusCode::OK);

    assert_eq!(BlacklistRepo::count_all(&pool).await.unwrap(), 1);
    assert_eq!(app.gateway.blacklist_snapshot().await.len(), 1);
}

// ---------------------------------------------------------------------------
// Test: removing an IP deletes it, re-pushes, and audits the delete
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn remove_deletes_and_audits(pool: PgPool) {
    let app = common::build_test_app(pool.clone());

    post_json(
        app.router.clone(),
        "/api/blacklist",
        json!({ "ip_or_cidr": "3.3.3.0/24", "action": "add" }),
    )
    .await;

    let response = post_json(
        app.router.clone(),
        "/api/blacklist",
        json!({ "ip_or_cidr": "3.3.3.0/24", "action": "remove" }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["message"], "IP 3.3.3.0/24 removed successfully");

    assert_eq!(BlacklistRepo::count_all(&pool).await.unwrap(), 0);
    assert!(app.gateway.blacklist_snapshot().await.is_empty());

    let deletes = AuditLogRepo::count_by_action_resource(&pool, "Delete", "Blacklist")
        .await
        .unwrap();
    assert_eq!(deletes, 1);
}

// ---------------------------------------------------------------------------
// Test: removing an absent IP succeeds without side effects
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn remove_of_absent_ip_is_idempotent(pool: PgPool) {
    let app = common::build_test_app(pool.clone());

    let response = post_json(
        app.router.clone(),
        "/api/blacklist",
        json!({ "ip_or_cidr": "8.8.8.8", "action": "remove" }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(BlacklistRepo::count_all(&pool).await.unwrap(), 0);
}

// ---------------------------------------------------------------------------
// Test: invalid action is rejected before any side effect
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn invalid_action_is_rejected_without_side_effects(pool: PgPool) {
    let app = common::build_test_app(pool.clone());

    let response = post_json(
        app.router.clone(),
        "/api/blacklist",
        json!({ "ip_or_cidr": "1.2.3.4", "action": "block" }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(BlacklistRepo::count_all(&pool).await.unwrap(), 0);
    assert!(app.gateway.blacklist_snapshot().await.is_empty());

    let audits = AuditLogRepo::list_recent(&pool, 10).await.unwrap();
    assert!(audits.is_empty());
}

// ---------------------------------------------------------------------------
// Test: expired entries are excluded from reads and pushes but kept as rows
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn expired_entries_are_excluded_but_retained(pool: PgPool) {
    let app = common::build_test_app(pool.clone());

    BlacklistRepo::insert(
        &pool,
        &CreateBlacklistEntry {
            ip_or_cidr: "9.9.9.9".to_string(),
            reason: None,
            added_by: None,
            expires_at: Some(Utc::now() - Duration::hours(1)),
        },
    )
    .await
    .unwrap();

    // Read path: the expired entry is invisible.
    let response = get(app.router.clone(), "/api/blacklist").await;
    let json = body_json(response).await;
    assert!(json["data"].as_array().unwrap().is_empty());

    // Push path: a mutation recomputes the valid set without it.
    post_json(
        app.router.clone(),
        "/api/blacklist",
        json!({ "ip_or_cidr": "5.5.5.5", "action": "add" }),
    )
    .await;
    assert_eq!(
        app.gateway.blacklist_snapshot().await,
        vec!["5.5.5.5".to_string()]
    );

    // The expired row itself is retained for history.
    assert_eq!(BlacklistRepo::count_all(&pool).await.unwrap(), 2);
}

// ---------------------------------------------------------------------------
// Test: with persistence off, reads and writes go straight to the gateway
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn persistence_off_proxies_the_gateway(pool: PgPool) {
    let mut config = common::test_config();
    config.blacklist_persist = false;
    let app = common::build_test_app_with(pool.clone(), config);

    // Seed the gateway directly.
    use apimgr_gateway::GatewayAdmin;
    app.gateway
        .update_blacklist(&["7.7.7.7".to_string()])
        .await
        .unwrap();

    let response = get(app.router.clone(), "/api/blacklist").await;
    let json = body_json(response).await;
    let entries = json["data"].as_array().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["ip_or_cidr"], "7.7.7.7");
    assert!(entries[0]["added_at"].is_null());

    // Mutations apply set semantics on the gateway list, no rows written.
    post_json(
        app.router.clone(),
        "/api/blacklist",
        json!({ "ip_or_cidr": "6.6.6.6", "action": "add" }),
    )
    .await;
    let mut snapshot = app.gateway.blacklist_snapshot().await;
    snapshot.sort();
    assert_eq!(snapshot, vec!["6.6.6.6".to_string(), "7.7.7.7".to_string()]);
    assert_eq!(BlacklistRepo::count_all(&pool).await.unwrap(), 0);
}
