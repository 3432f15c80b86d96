//! Canonical JSON serialization for signed request bodies.
//!
//! The server recomputes the signature over the exact body bytes, so the
//! encoding has to match its convention byte for byte:
//!
//! - compact output, no whitespace
//! - `/` is emitted as-is, never `\/`
//! - non-ASCII characters are emitted as UTF-8, never `\uXXXX`
//! - keys appear in insertion order (struct field order; `serde_json` is
//!   built with `preserve_order` so `Map` and `json!` keep theirs too)
//!
//! `serde_json`'s compact writer already behaves this way. Callers must sign
//! and send the returned `String` itself; re-serializing breaks the signature.

use serde::Serialize;

use crate::error::MmPayResult;

/// Serialize `payload` to its canonical JSON string.
pub fn canonicalize<T: Serialize + ?Sized>(payload: &T) -> MmPayResult<String> {
    Ok(serde_json::to_string(payload)?)
}
