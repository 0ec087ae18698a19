//! Route definitions for the gateway route proxy.

use axum::routing::get;
use axum::Router;

use crate::handlers::gateway_routes;
use crate::state::AppState;

/// Gateway route proxy mounted at `/routes`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(gateway_routes::list_routes).post(gateway_routes::create_route),
        )
        .route(
            "/{id}",
            get(gateway_routes::get_route)
                .put(gateway_routes::update_route)
                .delete(gateway_routes::delete_route),
        )
}
