//! # MMPay Rust SDK
//!
//! A Rust SDK for the MMPay payment API.
//!
//! ## Modules
//!
//! - [`api`]: HTTP client for handshake and payment creation (`api` feature)
//! - [`auth`]: request signing and callback verification
//! - [`canonical`]: the JSON encoding request signatures are computed over
//! - [`types`]: request and response types
//! - [`config`]: client configuration
//! - [`network`]: endpoint paths and header names
//! - [`error`]: SDK error type
//!
//! ## Quick Start - Payments
//!
//! ```rust,ignore
//! use mmpay::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ClientConfig::new("app_id", "pk_...", "sk_...", "https://api.example.com");
//!     let client = MmPayClient::new(config)?;
//!
//!     let params = PayParams::new("ORD-123", 1000, vec![PaymentItem::new("Item 1", 1000, 1)])
//!         .with_callback_url("https://shop.example.com/mmpay/callback");
//!
//!     // Handshake + payment creation
//!     let payment = client.pay(params).await?;
//!     println!("Pay at {:?}", payment.get_str("url"));
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Quick Start - Callbacks
//!
//! Signature checks need no HTTP stack and work with `default-features = false`:
//!
//! ```rust,ignore
//! use mmpay::auth::CallbackVerifier;
//!
//! let verifier = CallbackVerifier::new("sk_...");
//! let ok = verifier.verify(raw_body, nonce_header, signature_header);
//! ```

// ============================================================================
// MODULES
// ============================================================================

/// Request signing, nonces and callback verification.
pub mod auth;

/// Canonical JSON serialization for signed bodies.
pub mod canonical;

/// Client configuration (credentials and base URL).
pub mod config;

/// SDK error types.
pub mod error;

/// Endpoint paths, header names and the production/sandbox switch.
pub mod network;

/// Request and response types.
pub mod types;

/// HTTP client for the MMPay API.
#[cfg(feature = "api")]
pub mod api;

// ============================================================================
// PRELUDE
// ============================================================================

/// Prelude module for convenient imports.
///
/// ```rust,ignore
/// use mmpay::prelude::*;
/// ```
pub mod prelude {
    pub use crate::auth::{generate_nonce, generate_signature, verify_signature, CallbackVerifier};
    pub use crate::canonical::canonicalize;
    pub use crate::config::ClientConfig;
    pub use crate::error::{ErrorResponse, MmPayError, MmPayResult};
    pub use crate::network::Environment;
    pub use crate::types::{
        HandshakeRequest, HandshakeResponse, PayParams, PaymentItem, PaymentRequest,
        PaymentResponse,
    };

    #[cfg(feature = "api")]
    pub use crate::api::{MmPayClient, MmPayClientBuilder};
}
