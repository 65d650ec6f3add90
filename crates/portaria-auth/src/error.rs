//! Auth-specific error types.

/// Errors that can occur during authentication.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// No Authorization header or bearer token present.
    #[error("missing authentication token")]
    MissingToken,

    /// Token format is invalid.
    #[error("invalid token format: {0}")]
    InvalidFormat(String),

    /// Signature verification failed, or the provider rejected the token.
    #[error("invalid token signature: {0}")]
    InvalidSignature(String),

    /// Token has expired.
    #[error("token has expired")]
    Expired,

    /// Token audience doesn't match the configured audience.
    #[error("invalid audience")]
    InvalidAudience,

    /// E-mail domain doesn't match the configured login domain.
    #[error("invalid domain: got '{domain}', expected '{expected}'")]
    InvalidDomain { domain: String, expected: String },

    /// Token is missing the email claim.
    #[error("token missing email claim")]
    MissingEmail,

    /// The identity provider could not be reached.
    #[error("identity provider unavailable: {0}")]
    ProviderUnavailable(String),
}

impl AuthError {
    /// Whether this error should result in a 401 (vs. a 502).
    pub fn is_client_error(&self) -> bool {
        !matches!(self, AuthError::ProviderUnavailable(_))
    }
}
