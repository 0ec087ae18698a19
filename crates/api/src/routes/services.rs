//! Route definitions for the gateway service proxy.

use axum::routing::get;
use axum::Router;

use crate::handlers::services;
use crate::state::AppState;

/// Service proxy mounted at `/services`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(services::list_services).post(services::create_service))
        .route(
            "/{id}",
            get(services::get_service).delete(services::delete_service),
        )
}
