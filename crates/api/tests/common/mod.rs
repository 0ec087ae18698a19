#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

use apimgr_api::analytics::PrometheusClient;
use apimgr_api::audit::AuditRecorder;
use apimgr_api::background::SyncStatusHandle;
use apimgr_api::config::ServerConfig;
use apimgr_api::router::build_app_router;
use apimgr_api::secrets::MockVault;
use apimgr_api::state::AppState;
use apimgr_gateway::InMemoryGateway;

/// Build a test `ServerConfig` with safe defaults.
///
/// Persistence and audit writes are on, and the Prometheus URL points at a
/// closed port so analytics tests exercise the degraded path.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        blacklist_persist: true,
        whitelist_persist: true,
        audit_db_write: true,
        prometheus_url: "http://127.0.0.1:1".to_string(),
        sync_interval_secs: 1800,
    }
}

/// A fully wired application over an in-memory gateway, with handles kept
/// open so tests can assert on gateway-side state directly.
pub struct TestApp {
    pub router: Router,
    pub gateway: Arc<InMemoryGateway>,
    pub state: AppState,
}

pub fn build_test_app(pool: PgPool) -> TestApp {
    build_test_app_with(pool, test_config())
}

/// Same as [`build_test_app`] but with a caller-supplied config, for tests
/// that flip the persistence flags.
pub fn build_test_app_with(pool: PgPool, config: ServerConfig) -> TestApp {
    let gateway = Arc::new(InMemoryGateway::new());
    let audit = AuditRecorder::new(pool.clone(), config.audit_db_write);

    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        gateway: gateway.clone(),
        secrets: Arc::new(MockVault),
        audit,
        prometheus: Arc::new(PrometheusClient::new(config.prometheus_url.clone())),
        sync_status: SyncStatusHandle::new(),
    };

    TestApp {
        router: build_app_router(state.clone(), &config),
        gateway,
        state,
    }
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn get(app: Router, uri: &str) -> Response {
    app.oneshot(
        Request::builder()
            .method(Method::GET)
            .uri(uri)
            .body(Body::empty())
            .unwrap(),
    )
    .await
    .unwrap()
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    send_json(app, Method::POST, uri, body).await
}

pub async fn put_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    send_json(app, Method::PUT, uri, body).await
}

pub async fn delete(app: Router, uri: &str) -> Response {
    app.oneshot(
        Request::builder()
            .method(Method::DELETE)
            .uri(uri)
            .body(Body::empty())
            .unwrap(),
    )
    .await
    .unwrap()
}

async fn send_json(app: Router, method: Method, uri: &str, body: serde_json::Value) -> Response {
    app.oneshot(
        Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
    )
    .await
    .unwrap()
}

/// Collect a response body into JSON.
pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
