//! Route definitions for API key management.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::keys;
use crate::state::AppState;

/// Key management routes mounted at `/keys`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(keys::list_keys).post(keys::create_key))
        .route("/verify", post(keys::verify_key))
        .route("/{id}/quota", put(keys::update_quota))
        .route("/{id}/rotate", post(keys::rotate_key))
}
