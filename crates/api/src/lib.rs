//! Gateway admin control-plane API server library.
//!
//! Exposes the building blocks (config, state, error handling, routes,
//! services, background jobs) so integration tests and the binary
//! entrypoint can both access them.

pub mod analytics;
pub mod audit;
pub mod background;
pub mod config;
pub mod directory;
pub mod error;
pub mod handlers;
pub mod keys;
pub mod response;
pub mod router;
pub mod routes;
pub mod secrets;
pub mod state;
pub mod sync;
