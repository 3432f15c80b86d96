//! MMPay API client implementation.
//!
//! [`MmPayClient`] signs and sends handshake and payment-creation calls and
//! verifies callback signatures.
//!
//! A payment is always two calls: a handshake that returns a session token
//! (`btoken`), then the payment call carrying that token. The token is passed
//! from one call to the next as a local value and never stored on the client,
//! so concurrent payments on a shared client cannot mix up tokens.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::auth::{generate_nonce, generate_signature, verify_signature};
use crate::canonical::canonicalize;
use crate::config::ClientConfig;
use crate::error::{ErrorResponse, MmPayError, MmPayResult};
use crate::network::{Environment, BTOKEN_HEADER, NONCE_HEADER, SIGNATURE_HEADER};
use crate::types::{HandshakeResponse, PayParams, PaymentRequest, PaymentResponse};

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Builder for configuring [`MmPayClient`].
#[derive(Debug, Clone)]
pub struct MmPayClientBuilder {
    config: ClientConfig,
    timeout: Duration,
    default_headers: Vec<(String, String)>,
}

impl MmPayClientBuilder {
    /// Create a new builder for the given config.
    pub fn new(config: ClientConfig) -> Self {
        Self {
            config,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            default_headers: Vec::new(),
        }
    }

    /// Set the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the timeout in seconds.
    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.timeout = Duration::from_secs(secs);
        self
    }

    /// Add a default header to all requests.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.default_headers.push((name.into(), value.into()));
        self
    }

    /// Build the client.
    pub fn build(self) -> MmPayResult<MmPayClient> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        for (name, value) in self.default_headers {
            let header_name = HeaderName::try_from(name.as_str()).map_err(|e| {
                MmPayError::InvalidParameter(format!("Invalid header name '{}': {}", name, e))
            })?;
            let header_value = HeaderValue::from_str(&value).map_err(|e| {
                MmPayError::InvalidParameter(format!("Invalid header value for '{}': {}", name, e))
            })?;
            headers.insert(header_name, header_value);
        }

        let mut bearer = HeaderValue::from_str(&format!("Bearer {}", self.config.publishable_key()))
            .map_err(|_| {
                MmPayError::InvalidParameter(
                    "publishable key contains characters not allowed in a header".to_string(),
                )
            })?;
        bearer.set_sensitive(true);
        headers.insert(AUTHORIZATION, bearer);

        let http_client = Client::builder()
            .timeout(self.timeout)
            .default_headers(headers)
            .build()?;

        Ok(MmPayClient {
            http_client,
            config: self.config,
        })
    }
}

/// MMPay API client.
///
/// Cheap to clone; clones share the connection pool.
#[derive(Debug, Clone)]
pub struct MmPayClient {
    http_client: Client,
    config: ClientConfig,
}

impl MmPayClient {
    /// Create a new client with default settings (30s timeout).
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialized.
    pub fn new(config: ClientConfig) -> MmPayResult<Self> {
        MmPayClientBuilder::new(config).build()
    }

    /// Create a new client builder for custom configuration.
    pub fn builder(config: ClientConfig) -> MmPayClientBuilder {
        MmPayClientBuilder::new(config)
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &str {
        self.config.api_base_url()
    }

    // =========================================================================
    // Signing
    // =========================================================================

    /// Sign `body` with the client's secret key.
    pub fn generate_signature(&self, body: &str, nonce: &str) -> String {
        generate_signature(self.config.secret_key().as_bytes(), nonce, body)
    }

    /// Verify an inbound callback.
    ///
    /// `payload` is the raw request body; `nonce` and `expected_signature` are
    /// the `X-Mmpay-Nonce` and `X-Mmpay-Signature` header values. Returns
    /// `false` if any of them is empty.
    pub fn verify_callback(&self, payload: &str, nonce: &str, expected_signature: &str) -> bool {
        verify_signature(
            self.config.secret_key().as_bytes(),
            payload,
            nonce,
            expected_signature,
        )
    }

    // =========================================================================
    // Handshake
    // =========================================================================

    /// Production handshake (`POST /payments/handshake`).
    pub async fn handshake<P: Serialize + ?Sized>(
        &self,
        payload: &P,
    ) -> MmPayResult<HandshakeResponse> {
        self.handshake_in(Environment::Production, payload).await
    }

    /// Sandbox handshake (`POST /payments/sandbox-handshake`).
    pub async fn sandbox_handshake<P: Serialize + ?Sized>(
        &self,
        payload: &P,
    ) -> MmPayResult<HandshakeResponse> {
        self.handshake_in(Environment::Sandbox, payload).await
    }

    /// Sign and send a handshake to the given environment.
    ///
    /// The returned response carries the session token, if any, in
    /// [`HandshakeResponse::token`].
    pub async fn handshake_in<P: Serialize + ?Sized>(
        &self,
        env: Environment,
        payload: &P,
    ) -> MmPayResult<HandshakeResponse> {
        let body = canonicalize(payload)?;
        let nonce = generate_nonce();
        self.signed_post(env.handshake_path(), body, &nonce, None)
            .await
    }

    // =========================================================================
    // Payments
    // =========================================================================

    /// Create a production payment.
    ///
    /// Performs the production handshake first and sends its token with the
    /// payment call.
    pub async fn pay(&self, params: PayParams) -> MmPayResult<PaymentResponse> {
        self.pay_in(Environment::Production, params).await
    }

    /// Create a sandbox payment.
    pub async fn sandbox_pay(&self, params: PayParams) -> MmPayResult<PaymentResponse> {
        self.pay_in(Environment::Sandbox, params).await
    }

    /// Create a payment in the given environment.
    ///
    /// # Errors
    ///
    /// [`MmPayError::InvalidParameter`] before any network call if `params`
    /// is invalid. If the handshake fails its error is returned and the
    /// payment call is not made.
    pub async fn pay_in(&self, env: Environment, params: PayParams) -> MmPayResult<PaymentResponse> {
        params.validate()?;

        let nonce = generate_nonce();
        let request = PaymentRequest::new(self.config.app_id(), nonce.as_str(), params);
        let body = canonicalize(&request)?;

        let handshake = self
            .handshake_in(env, &request.handshake_request())
            .await?;

        let btoken = handshake.token();
        if btoken.is_none() {
            tracing::warn!(
                env = %env,
                order_id = %request.order_id,
                "Handshake response carried no token, sending payment without btoken"
            );
        }

        self.signed_post(env.create_payment_path(), body, &nonce, btoken)
            .await
    }

    // =========================================================================
    // Internal helpers
    // =========================================================================

    /// POST `body` exactly as given, signed with `nonce`.
    async fn signed_post<T: DeserializeOwned>(
        &self,
        path: &str,
        body: String,
        nonce: &str,
        btoken: Option<&str>,
    ) -> MmPayResult<T> {
        let url = format!("{}{}", self.config.api_base_url(), path);
        let signature = self.generate_signature(&body, nonce);

        let mut request = self
            .http_client
            .post(&url)
            .header(NONCE_HEADER, nonce)
            .header(SIGNATURE_HEADER, signature);
        if let Some(token) = btoken {
            request = request.header(BTOKEN_HEADER, token);
        }

        tracing::debug!(endpoint = %path, nonce = %nonce, "Sending signed request");

        let response = request.body(body).send().await?;
        let status = response.status();

        tracing::debug!(endpoint = %path, status = %status, "Received response");

        if !status.is_success() {
            return Err(Self::parse_error_response(response).await);
        }

        let text = response.text().await?;
        serde_json::from_str::<T>(&text).map_err(|e| {
            MmPayError::Decode(format!("Failed to deserialize response: {}", e))
        })
    }

    /// Parse an error response into an MmPayError.
    async fn parse_error_response(response: reqwest::Response) -> MmPayError {
        let status = response.status();
        let error_response = match response.text().await {
            Ok(text) => ErrorResponse::parse(&text),
            Err(e) => {
                tracing::warn!("Failed to read error response body: {}", e);
                ErrorResponse::from_text(format!("HTTP {} (body unreadable: {})", status, e))
            }
        };

        Self::map_status_error(status, error_response)
    }

    /// Map HTTP status code to MmPayError.
    fn map_status_error(status: StatusCode, response: ErrorResponse) -> MmPayError {
        match status {
            StatusCode::BAD_REQUEST => MmPayError::BadRequest(response),
            StatusCode::UNAUTHORIZED => MmPayError::Unauthorized(response),
            StatusCode::FORBIDDEN => MmPayError::Forbidden(response),
            StatusCode::NOT_FOUND => MmPayError::NotFound(response),
            StatusCode::TOO_MANY_REQUESTS => MmPayError::RateLimited(response),
            _ if status.is_server_error() => MmPayError::ServerError(response),
            _ => MmPayError::UnexpectedStatus(status.as_u16(), response),
        }
    }
}
