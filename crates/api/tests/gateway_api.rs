//! Integration tests for the gateway route/consumer proxy endpoints,
//! analytics degradation, and the sync status endpoint.

mod common;

use axum::http::StatusCode;
use common::{body_json, delete, get, post_json, put_json};
use serde_json::json;
use sqlx::PgPool;

use apimgr_db::repositories::AuditLogRepo;

// ---------------------------------------------------------------------------
// Routes proxy
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn route_crud_round_trip(pool: PgPool) {
    let app = common::build_test_app(pool.clone());

    // Create.
    let response = post_json(
        app.router.clone(),
        "/api/routes",
        json!({ "id": "r1", "uri": "/v1/*", "methods": ["GET"] }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    // Read.
    let response = get(app.router.clone(), "/api/routes/r1").await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["uri"], "/v1/*");

    // Update.
    let response = put_json(
        app.router.clone(),
        "/api/routes/r1",
        json!({ "uri": "/v2/*" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    // List.
    let response = get(app.router.clone(), "/api/routes").await;
    let json = body_json(response).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 1);
    assert_eq!(json["data"][0]["uri"], "/v2/*");

    // Delete.
    let response = delete(app.router.clone(), "/api/routes/r1").await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    let response = get(app.router.clone(), "/api/routes/r1").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // One audit row per mutation.
    for (action, expected) in [("Create", 1), ("Update", 1), ("Delete", 1)] {
        let count = AuditLogRepo::count_by_action_resource(&pool, action, "Route")
            .await
            .unwrap();
        assert_eq!(count, expected, "audit count for {action}");
    }
}

#[sqlx::test(migrations = "../db/migrations")]
async fn create_route_generates_id_when_absent(pool: PgPool) {
    let app = common::build_test_app(pool);

    let response = post_json(
        app.router.clone(),
        "/api/routes",
        json!({ "uri": "/auto/*" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert!(json["data"]["id"].as_str().unwrap().len() == 36);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn missing_route_is_not_found(pool: PgPool) {
    let app = common::build_test_app(pool);

    let response = get(app.router.clone(), "/api/routes/ghost").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_json(response).await;
    assert!(json["error"].as_str().unwrap().contains("not found"));
}

// ---------------------------------------------------------------------------
// Services proxy
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn service_create_get_delete(pool: PgPool) {
    let app = common::build_test_app(pool.clone());

    let response = post_json(
        app.router.clone(),
        "/api/services",
        json!({ "id": "s1", "name": "billing-upstream" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = get(app.router.clone(), "/api/services/s1").await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["name"], "billing-upstream");

    let response = get(app.router.clone(), "/api/services").await;
    assert_eq!(response.status(), StatusCode::OK);
    let listed = body_json(response).await;
    assert_eq!(listed["data"].as_array().unwrap().len(), 1);
    assert_eq!(listed["data"][0]["id"], "s1");

    let response = delete(app.router.clone(), "/api/services/s1").await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    let response = get(app.router.clone(), "/api/services/s1").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let creates = AuditLogRepo::count_by_action_resource(&pool, "Create", "Service")
        .await
        .unwrap();
    assert_eq!(creates, 1);
}

// ---------------------------------------------------------------------------
// Consumers proxy
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn consumer_create_get_delete(pool: PgPool) {
    let app = common::build_test_app(pool.clone());

    let response = post_json(
        app.router.clone(),
        "/api/consumers",
        json!({ "username": "svc-billing", "desc": "billing service" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = get(app.router.clone(), "/api/consumers/svc-billing").await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["desc"], "billing service");

    let response = delete(app.router.clone(), "/api/consumers/svc-billing").await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    let response = get(app.router.clone(), "/api/consumers/svc-billing").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let creates = AuditLogRepo::count_by_action_resource(&pool, "Create", "Consumer")
        .await
        .unwrap();
    assert_eq!(creates, 1);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn consumer_without_username_is_rejected(pool: PgPool) {
    let app = common::build_test_app(pool);

    let response = post_json(
        app.router.clone(),
        "/api/consumers",
        json!({ "username": "  " }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Analytics degradation
// ---------------------------------------------------------------------------

// The test config points Prometheus at a closed port, so every analytics
// endpoint must degrade to an empty data array instead of erroring.
#[sqlx::test(migrations = "../db/migrations")]
async fn analytics_degrade_to_empty_results(pool: PgPool) {
    let app = common::build_test_app(pool);

    for path in [
        "/api/analytics/requests",
        "/api/analytics/latency",
        "/api/analytics/errors",
    ] {
        let response = get(app.router.clone(), path).await;
        assert_eq!(response.status(), StatusCode::OK, "{path}");
        let json = body_json(response).await;
        assert!(json["data"].as_array().unwrap().is_empty(), "{path}");
    }
}

// ---------------------------------------------------------------------------
// Sync status
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn sync_status_starts_idle(pool: PgPool) {
    let app = common::build_test_app(pool);

    let response = get(app.router.clone(), "/api/sync-status").await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["state"], "Idle");
    assert!(json["data"]["last_sync_at"].is_null());
}
