//! Client library for the APISIX Admin API.
//!
//! Provides typed resource models, the [`GatewayAdmin`] trait describing the
//! admin operations the control plane needs, an HTTP implementation backed by
//! [`reqwest`], and an in-memory implementation for tests and dev mode.

pub mod admin;
pub mod client;
pub mod error;
pub mod memory;
pub mod types;

pub use admin::GatewayAdmin;
pub use client::GatewayClient;
pub use error::GatewayError;
pub use memory::InMemoryGateway;
