pub mod analytics;
pub mod blacklist;
pub mod consumers;
pub mod gateway_routes;
pub mod health;
pub mod keys;
pub mod services;
pub mod sync_status;
pub mod whitelist;

use axum::Router;

use crate::state::AppState;

/// Build the `/api` route tree.
///
/// ```text
/// /blacklist                      GET list, POST mutate
/// /whitelist/route/{route_id}     GET list, POST mutate
/// /routes                         GET list, POST create
/// /routes/{id}                    GET, PUT, DELETE
/// /services                       GET list, POST create
/// /services/{id}                  GET, DELETE
/// /consumers                      GET list, POST create
/// /consumers/{username}           GET, DELETE
/// /keys                           GET list, POST issue
/// /keys/verify                    POST  (usage check + count)
/// /keys/{id}/quota                PUT
/// /keys/{id}/rotate               POST  ({id} = consumer username)
/// /analytics/requests             GET
/// /analytics/latency              GET
/// /analytics/errors               GET
/// /sync-status                    GET
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/blacklist", blacklist::router())
        .nest("/whitelist", whitelist::router())
        .nest("/routes", gateway_routes::router())
        .nest("/services", services::router())
        .nest("/consumers", consumers::router())
        .nest("/keys", keys::router())
        .nest("/analytics", analytics::router())
        .merge(sync_status::router())
}
