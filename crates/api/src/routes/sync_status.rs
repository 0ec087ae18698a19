//! Route definition for the background sync status.

use axum::routing::get;
use axum::Router;

use crate::handlers::sync_status;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/sync-status", get(sync_status::sync_status))
}
