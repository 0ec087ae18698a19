use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use apimgr_api::analytics::PrometheusClient;
use apimgr_api::audit::AuditRecorder;
use apimgr_api::background::{group_sync, SyncStatusHandle};
use apimgr_api::config::ServerConfig;
use apimgr_api::directory::StaticDirectory;
use apimgr_api::router::build_app_router;
use apimgr_api::secrets::MockVault;
use apimgr_api::state::AppState;
use apimgr_gateway::{GatewayAdmin, GatewayClient, InMemoryGateway};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "apimgr_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    // --- Database ---
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let pool = apimgr_db::create_pool(&database_url)
        .await
        .expect("Failed to connect to database");
    tracing::info!("Database connection pool created");

    apimgr_db::health_check(&pool)
        .await
        .expect("Database health check failed");
    tracing::info!("Database health check passed");

    apimgr_db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Database migrations applied");

    // --- Gateway backend ---
    // GATEWAY_MODE=memory runs against the in-memory gateway (dev/demo);
    // anything else talks to the real admin API.
    let gateway: Arc<dyn GatewayAdmin> =
        if std::env::var("GATEWAY_MODE").as_deref() == Ok("memory") {
            tracing::warn!("Running against the in-memory gateway backend");
            Arc::new(InMemoryGateway::new())
        } else {
            Arc::new(GatewayClient::from_env())
        };

    // --- App state ---
    let sync_status = SyncStatusHandle::new();
    let audit = AuditRecorder::new(pool.clone(), config.audit_db_write);
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        gateway,
        secrets: Arc::new(MockVault),
        audit,
        prometheus: Arc::new(PrometheusClient::new(config.prometheus_url.clone())),
        sync_status,
    };

    // --- Background sync job ---
    let sync_cancel = CancellationToken::new();
    let directory = Arc::new(StaticDirectory::from_env());
    let sync_handle = tokio::spawn(group_sync::run(
        state.clone(),
        directory,
        sync_cancel.clone(),
    ));

    // --- Router ---
    let app = build_app_router(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    // --- Post-shutdown cleanup ---
    tracing::info!("Server stopped accepting connections, cleaning up");

    sync_cancel.cancel();
    let _ = tokio::time::timeout(Duration::from_secs(5), sync_handle).await;
    tracing::info!("Background sync job stopped");

    tracing::info!("Graceful shutdown complete");
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix) so the server
/// shuts down cleanly whether stopped interactively or by a process
/// manager (e.g. systemd, Docker, Kubernetes).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
