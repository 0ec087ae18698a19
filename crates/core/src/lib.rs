//! Shared domain types and logic for the gateway admin control plane.
//!
//! This crate has no I/O dependencies so it can be used by the database
//! layer, the HTTP service, and any future CLI tooling alike.

pub mod api_keys;
pub mod audit;
pub mod error;
pub mod types;
