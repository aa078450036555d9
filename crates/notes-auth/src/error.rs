//! Error types for credential storage and auth-server calls

/// Errors from auth-server calls and token storage.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The auth server could not be reached
    #[error("HTTP request failed: {0}")]
    Http(String),

    /// The auth server answered with an unexpected status or body
    #[error("token exchange failed: {0}")]
    TokenExchange(String),

    /// The auth server rejected the credentials (401/403)
    #[error("invalid credentials: {0}")]
    InvalidCredentials(String),

    #[error("credential parse error: {0}")]
    CredentialParse(String),

    #[error("I/O error: {0}")]
    Io(String),
}

impl Error {
    /// True when the failure happened before any response arrived.
    pub fn is_network(&self) -> bool {
        matches!(self, Error::Http(_))
    }
}

/// Result alias for auth operations.
pub type Result<T> = std::result::Result<T, Error>;
