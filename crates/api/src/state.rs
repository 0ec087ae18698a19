use std::sync::Arc;

use apimgr_gateway::GatewayAdmin;

use crate::analytics::PrometheusClient;
use crate::audit::AuditRecorder;
use crate::background::SyncStatusHandle;
use crate::config::ServerConfig;
use crate::secrets::SecretsStore;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: apimgr_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Gateway admin backend, selected at construction (HTTP or in-memory).
    pub gateway: Arc<dyn GatewayAdmin>,
    /// Secrets backend for raw key material.
    pub secrets: Arc<dyn SecretsStore>,
    /// Audit trail writer.
    pub audit: AuditRecorder,
    /// Analytics (Prometheus) query client.
    pub prometheus: Arc<PrometheusClient>,
    /// Status handle updated by the periodic background sync.
    pub sync_status: SyncStatusHandle,
}
