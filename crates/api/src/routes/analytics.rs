//! Route definitions for traffic analytics.

use axum::routing::get;
use axum::Router;

use crate::handlers::analytics;
use crate::state::AppState;

/// Analytics routes mounted at `/analytics`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/requests", get(analytics::request_rates))
        .route("/latency", get(analytics::latency_percentiles))
        .route("/errors", get(analytics::error_rates))
}
