//! Shared response envelope types for API handlers.
//!
//! All API responses use a `{ "data": ... }` envelope; mutations that only
//! need to acknowledge use [`MessageResponse`].

use serde::Serialize;

/// Standard `{ "data": T }` response envelope.
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}

/// Standard `{ "message": ... }` acknowledgement.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}
