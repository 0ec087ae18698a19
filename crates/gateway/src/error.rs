/// Errors from the gateway admin client.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// The HTTP request itself failed (network, DNS, TLS, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The gateway returned a non-2xx status code.
    #[error("Gateway admin API error ({status}): {body}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },

    /// The gateway answered 2xx but the payload did not have the
    /// expected shape (e.g. missing `node.value` envelope).
    #[error("Unexpected gateway response: {0}")]
    Malformed(String),
}

impl GatewayError {
    /// Whether this error is a gateway-side 404.
    pub fn is_not_found(&self) -> bool {
        matches!(self, GatewayError::Api { status: 404, .. })
    }
}
