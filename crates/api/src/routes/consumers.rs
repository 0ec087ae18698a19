//! Route definitions for the gateway consumer proxy.

use axum::routing::get;
use axum::Router;

use crate::handlers::consumers;
use crate::state::AppState;

/// Consumer proxy mounted at `/consumers`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(consumers::list_consumers).post(consumers::create_consumer),
        )
        .route(
            "/{username}",
            get(consumers::get_consumer).delete(consumers::delete_consumer),
        )
}
