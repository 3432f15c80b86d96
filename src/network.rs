//! Endpoint paths and header names for the MMPay API.

/// Production handshake endpoint.
pub const HANDSHAKE_PATH: &str = "/payments/handshake";

/// Sandbox handshake endpoint.
pub const SANDBOX_HANDSHAKE_PATH: &str = "/payments/sandbox-handshake";

/// Production payment creation endpoint.
pub const CREATE_PAYMENT_PATH: &str = "/payments/create";

/// Sandbox payment creation endpoint.
pub const SANDBOX_CREATE_PAYMENT_PATH: &str = "/payments/sandbox-create";

/// Header carrying the request nonce.
pub const NONCE_HEADER: &str = "X-Mmpay-Nonce";

/// Header carrying the hex HMAC-SHA256 signature.
pub const SIGNATURE_HEADER: &str = "X-Mmpay-Signature";

/// Header carrying the session token from the preceding handshake.
pub const BTOKEN_HEADER: &str = "X-Mmpay-Btoken";

/// Which set of endpoints a call targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Environment {
    Production,
    Sandbox,
}

impl Environment {
    pub fn handshake_path(&self) -> &'static str {
        match self {
            Self::Production => HANDSHAKE_PATH,
            Self::Sandbox => SANDBOX_HANDSHAKE_PATH,
        }
    }

    pub fn create_payment_path(&self) -> &'static str {
        match self {
            Self::Production => CREATE_PAYMENT_PATH,
            Self::Sandbox => SANDBOX_CREATE_PAYMENT_PATH,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Production => "production",
            Self::Sandbox => "sandbox",
        }
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
