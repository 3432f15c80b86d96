//! HTTP client for the MMPay API.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use mmpay::api::MmPayClient;
//! use mmpay::config::ClientConfig;
//! use mmpay::types::{PayParams, PaymentItem};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = MmPayClient::new(ClientConfig::from_env()?)?;
//!
//!     let params = PayParams::new("ORD-123", 1000, vec![PaymentItem::new("Item 1", 1000, 1)])
//!         .with_currency("MMK");
//!
//!     let payment = client.sandbox_pay(params).await?;
//!     println!("Redirect to {:?}", payment.get_str("url"));
//!
//!     Ok(())
//! }
//! ```
//!
//! # Error Handling
//!
//! All methods return `MmPayResult<T>`:
//!
//! ```rust,ignore
//! use mmpay::error::MmPayError;
//!
//! match client.pay(params).await {
//!     Ok(payment) => println!("Created: {:?}", payment),
//!     Err(MmPayError::Unauthorized(resp)) => println!("Bad keys: {}", resp),
//!     Err(MmPayError::Http(e)) if e.is_timeout() => println!("Timed out"),
//!     Err(e) => println!("Other error: {}", e),
//! }
//! ```

pub mod client;

pub use client::{MmPayClient, MmPayClientBuilder};
