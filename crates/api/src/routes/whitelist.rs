//! Route definitions for per-route IP whitelists.

use axum::routing::get;
use axum::Router;

use crate::handlers::whitelist;
use crate::state::AppState;

/// Whitelist routes mounted at `/whitelist`.
pub fn router() -> Router<AppState> {
    Router::new().route(
        "/route/{route_id}",
        get(whitelist::list_whitelist).post(whitelist::mutate_whitelist),
    )
}
