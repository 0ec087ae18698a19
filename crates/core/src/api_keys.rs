//! API key generation, hashing, and expiry-window helpers.
//!
//! This module lives in `core` (zero internal deps) so it can be used by both
//! the HTTP service and the background key-lifecycle job.

use rand::Rng;
use sha2::{Digest, Sha256};

use crate::types::Timestamp;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Prefix carried by every minted key so leaked tokens are attributable.
pub const KEY_PREFIX: &str = "mk_";

/// Number of random hex characters after the prefix.
pub const KEY_RANDOM_LENGTH: usize = 32;

/// Keys expiring within this many days trigger a warning (but no rotation)
/// from the periodic lifecycle check.
pub const NEAR_EXPIRY_WARNING_DAYS: i64 = 5;

/// Default validity applied when a rotation extends a stored key.
pub const DEFAULT_VALIDITY_DAYS: i64 = 90;

// ---------------------------------------------------------------------------
// Key generation
// ---------------------------------------------------------------------------

/// The result of minting a new API key.
pub struct GeneratedApiKey {
    /// The plaintext key (shown to the caller exactly once, never stored).
    pub plaintext: String,
    /// The SHA-256 hex digest of the plaintext key (stored in the database).
    pub hash: String,
}

/// Mint a new random API key.
///
/// Returns the plaintext (disclosed once) and its SHA-256 hash (for storage).
/// The plaintext must never be persisted.
pub fn generate_api_key() -> GeneratedApiKey {
    let mut rng = rand::rng();
    let random: String = (0..KEY_RANDOM_LENGTH)
        .map(|_| {
            let n: u8 = rng.random_range(0..16);
            char::from_digit(n as u32, 16).unwrap()
        })
        .collect();

    let plaintext = format!("{KEY_PREFIX}{random}");
    let hash = hash_api_key(&plaintext);

    GeneratedApiKey { plaintext, hash }
}

/// Compute the SHA-256 hex digest of an API key.
///
/// Used both during key creation (to store the hash) and during lookups.
pub fn hash_api_key(key: &str) -> String {
    let digest = Sha256::digest(key.as_bytes());
    digest.iter().map(|b| format!("{b:02x}")).collect()
}

// ---------------------------------------------------------------------------
// Expiry windows
// ---------------------------------------------------------------------------

/// Whether a key with the given expiry is past its validity window.
pub fn is_expired(expires_at: Timestamp, now: Timestamp) -> bool {
    expires_at <= now
}

/// Whether a key is still valid but inside the near-expiry warning window.
pub fn is_near_expiry(expires_at: Timestamp, now: Timestamp) -> bool {
    !is_expired(expires_at, now)
        && expires_at - now <= chrono::Duration::days(NEAR_EXPIRY_WARNING_DAYS)
}
