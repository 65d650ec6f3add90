//! Error types for portaria-backend

use thiserror::Error;

/// Result type alias for portaria-backend operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while talking to the backend
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// The provider answered with an error; its message is kept verbatim.
    #[error("{message}")]
    Provider {
        /// HTTP status returned by the provider
        status: u16,
        /// Provider's message
        message: String,
    },

    /// E-mail/password sign-in was refused.
    #[error("invalid login credentials")]
    InvalidCredentials,

    /// A row or user addressed by ID does not exist.
    #[error("{entity} {id} not found")]
    NotFound {
        /// What was looked up
        entity: &'static str,
        /// The missing ID
        id: String,
    },

    /// Transport-level failure.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The provider's response did not have the expected shape.
    #[error("Unexpected response: {0}")]
    Decode(String),

    /// Error from portaria-core
    #[error("Core error: {0}")]
    Core(#[from] portaria_core::Error),

    /// Token issuing failed.
    #[error("Token error: {0}")]
    Token(#[from] portaria_auth::AuthError),
}

impl Error {
    /// Shorthand for [`Error::NotFound`].
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        Error::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    /// Whether the provider rejected the request because of its content
    /// (4xx), as opposed to being unreachable or failing (5xx).
    pub fn is_client_error(&self) -> bool {
        match self {
            Error::Provider { status, .. } => (400..500).contains(status),
            Error::InvalidCredentials | Error::NotFound { .. } => true,
            Error::Core(e) => e.is_client_error(),
            _ => false,
        }
    }
}
