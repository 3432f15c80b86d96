//! Client configuration.

use crate::error::{MmPayError, MmPayResult};

/// Environment variable holding the merchant app id.
pub const ENV_APP_ID: &str = "MMPAY_APP_ID";
/// Environment variable holding the publishable (bearer) key.
pub const ENV_PUBLISHABLE_KEY: &str = "MMPAY_PUBLISHABLE_KEY";
/// Environment variable holding the HMAC secret key.
pub const ENV_SECRET_KEY: &str = "MMPAY_SECRET_KEY";
/// Environment variable holding the API base URL.
pub const ENV_API_BASE_URL: &str = "MMPAY_API_BASE_URL";

/// Merchant credentials and API location.
///
/// The secret key signs requests and verifies callbacks; it is never sent
/// over the wire and is redacted from `Debug` output.
#[derive(Clone, PartialEq, Eq)]
pub struct ClientConfig {
    app_id: String,
    publishable_key: String,
    secret_key: String,
    api_base_url: String,
}

impl ClientConfig {
    /// Create a config. Trailing slashes are stripped from `api_base_url`.
    pub fn new(
        app_id: impl Into<String>,
        publishable_key: impl Into<String>,
        secret_key: impl Into<String>,
        api_base_url: impl Into<String>,
    ) -> Self {
        Self {
            app_id: app_id.into(),
            publishable_key: publishable_key.into(),
            secret_key: secret_key.into(),
            api_base_url: api_base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Load the config from `MMPAY_APP_ID`, `MMPAY_PUBLISHABLE_KEY`,
    /// `MMPAY_SECRET_KEY` and `MMPAY_API_BASE_URL`.
    ///
    /// # Errors
    ///
    /// Returns [`MmPayError::Config`] naming the first variable that is unset
    /// or empty.
    pub fn from_env() -> MmPayResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup<F>(lookup: F) -> MmPayResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let require = |key: &str| -> MmPayResult<String> {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| MmPayError::Config(format!("{} is not set", key)))
        };

        Ok(Self::new(
            require(ENV_APP_ID)?,
            require(ENV_PUBLISHABLE_KEY)?,
            require(ENV_SECRET_KEY)?,
            require(ENV_API_BASE_URL)?,
        ))
    }

    pub fn app_id(&self) -> &str {
        &self.app_id
    }

    pub fn publishable_key(&self) -> &str {
        &self.publishable_key
    }

    pub(crate) fn secret_key(&self) -> &str {
        &self.secret_key
    }

    /// Base URL without trailing slash.
    pub fn api_base_url(&self) -> &str {
        &self.api_base_url
    }
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("app_id", &self.app_id)
            .field("publishable_key", &"<redacted>")
            .field("secret_key", &"<redacted>")
            .field("api_base_url", &self.api_base_url)
            .finish()
    }
}
