//! Request signing and callback verification.
//!
//! Every request is signed with HMAC-SHA256 over `"{nonce}.{body}"` using the
//! merchant secret key, hex-encoded in lowercase. Inbound callbacks are signed
//! the same way and are checked with [`CallbackVerifier`].
//!
//! # Verifying a callback
//!
//! ```rust,ignore
//! use mmpay::auth::CallbackVerifier;
//!
//! let verifier = CallbackVerifier::new(secret_key);
//! if !verifier.verify(&raw_body, nonce_header, signature_header) {
//!     return StatusCode::UNAUTHORIZED;
//! }
//! ```

use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use serde::de::DeserializeOwned;
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

use crate::error::{MmPayError, MmPayResult};

type HmacSha256 = Hmac<Sha256>;

/// Generate a nonce from the current wall-clock time (milliseconds since the
/// UNIX epoch).
pub fn generate_nonce() -> String {
    generate_nonce_at(Utc::now())
}

/// Generate the nonce for a specific instant.
pub fn generate_nonce_at(at: DateTime<Utc>) -> String {
    at.timestamp_millis().to_string()
}

/// The string that gets signed: `"{nonce}.{body}"`.
pub fn string_to_sign(nonce: &str, body: &str) -> String {
    format!("{}.{}", nonce, body)
}

/// Compute the lowercase hex HMAC-SHA256 signature of `"{nonce}.{body}"`.
///
/// `body` must be the exact string sent (or received) on the wire.
pub fn generate_signature(secret_key: &[u8], nonce: &str, body: &str) -> String {
    let mut mac = HmacSha256::new_from_slice(secret_key).expect("HMAC accepts any key length");
    mac.update(string_to_sign(nonce, body).as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

/// Check `expected_signature` against the signature of `payload`.
///
/// Returns `false` without computing anything if any input is empty. The
/// comparison is constant time.
pub fn verify_signature(
    secret_key: &[u8],
    payload: &str,
    nonce: &str,
    expected_signature: &str,
) -> bool {
    if payload.is_empty() || nonce.is_empty() || expected_signature.is_empty() {
        return false;
    }

    let generated = generate_signature(secret_key, nonce, payload);
    constant_time_eq(generated.as_bytes(), expected_signature.as_bytes())
}

/// Constant-time comparison that leaks neither content nor length.
///
/// Both inputs are hashed to fixed-length digests first.
pub(crate) fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    let ha = Sha256::digest(a);
    let hb = Sha256::digest(b);
    ha.ct_eq(&hb).into()
}

/// Verifies callback signatures without needing an HTTP client.
#[derive(Clone)]
pub struct CallbackVerifier {
    secret_key: String,
}

impl CallbackVerifier {
    pub fn new(secret_key: impl Into<String>) -> Self {
        Self {
            secret_key: secret_key.into(),
        }
    }

    /// Verify a callback.
    ///
    /// # Arguments
    ///
    /// * `payload` - Raw request body as received, not re-serialized
    /// * `nonce` - Value of the `X-Mmpay-Nonce` header
    /// * `expected_signature` - Value of the `X-Mmpay-Signature` header
    pub fn verify(&self, payload: &str, nonce: &str, expected_signature: &str) -> bool {
        verify_signature(self.secret_key.as_bytes(), payload, nonce, expected_signature)
    }

    /// Verify a callback, then decode its body.
    ///
    /// # Errors
    ///
    /// [`MmPayError::InvalidSignature`] if verification fails,
    /// [`MmPayError::Decode`] if the body does not deserialize into `T`.
    pub fn verify_and_decode<T: DeserializeOwned>(
        &self,
        payload: &str,
        nonce: &str,
        expected_signature: &str,
    ) -> MmPayResult<T> {
        if !self.verify(payload, nonce, expected_signature) {
            tracing::debug!(nonce = %nonce, "Rejected callback with invalid signature");
            return Err(MmPayError::InvalidSignature);
        }
        serde_json::from_str(payload)
            .map_err(|e| MmPayError::Decode(format!("Failed to decode callback body: {}", e)))
    }
}

impl std::fmt::Debug for CallbackVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CallbackVerifier")
            .field("secret_key", &"<redacted>")
            .finish()
    }
}
