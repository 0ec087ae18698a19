//! Route definitions for the global IP blacklist.

use axum::routing::get;
use axum::Router;

use crate::handlers::blacklist;
use crate::state::AppState;

/// Blacklist routes mounted at `/blacklist`.
pub fn router() -> Router<AppState> {
    Router::new().route(
        "/",
        get(blacklist::list_blacklist).post(blacklist::mutate_blacklist),
    )
}
