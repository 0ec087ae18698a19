//! Secrets backend seam.
//!
//! The real deployment stores raw key material in a vault; this codebase
//! ships only the mocked backend (the upstream system never wired a real
//! one either). The trait keeps the call sites honest about where plaintext
//! keys flow.

use async_trait::async_trait;

/// Where raw API keys are stored. Returns an opaque version identifier.
#[async_trait]
pub trait SecretsStore: Send + Sync {
    /// Store a secret at the given path, returning the stored version.
    async fn store(&self, path: &str, secret: &str) -> anyhow::Result<String>;

    /// Retrieve a secret by path.
    async fn get(&self, path: &str) -> anyhow::Result<String>;
}

/// Mock vault: logs the operation and returns fixed placeholder values.
#[derive(Default)]
pub struct MockVault;

#[async_trait]
impl SecretsStore for MockVault {
    async fn store(&self, path: &str, _secret: &str) -> anyhow::Result<String> {
        tracing::info!(path, "Storing secret in vault (mock)");
        Ok("vault-version-1".to_string())
    }

    async fn get(&self, path: &str) -> anyhow::Result<String> {
        tracing::info!(path, "Retrieving secret from vault (mock)");
        Ok("mock-secret-value".to_string())
    }
}

/// Vault path for a consumer's API key.
pub fn api_key_path(owner: &str) -> String {
    format!("secret/apikeys/{owner}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn mock_vault_returns_fixed_version() {
        let vault = MockVault;
        let version = vault.store("secret/apikeys/x", "mk_abc").await.unwrap();
        assert_eq!(version, "vault-version-1");
    }

    #[test]
    fn api_key_path_includes_owner() {
        assert_eq!(api_key_path("payment-gateway"), "secret/apikeys/payment-gateway");
    }
}
