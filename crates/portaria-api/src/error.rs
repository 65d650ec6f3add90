//! Error types for portaria-api
//!
//! Every error renders as `{"error": {"category", "message"}}` with a
//! status that reflects who is at fault.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use thiserror::Error;

/// Result type alias for portaria-api handlers
pub type Result<T> = std::result::Result<T, Error>;

/// Which login field was wrong.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LoginFailure {
    /// No profile has that username.
    #[serde(rename = "usuario")]
    UnknownUser,
    /// The username exists but the password was refused.
    #[serde(rename = "senha")]
    WrongPassword,
}

impl LoginFailure {
    fn message(&self) -> &'static str {
        match self {
            LoginFailure::UnknownUser => "unknown username",
            LoginFailure::WrongPassword => "wrong password",
        }
    }
}

/// Errors that can occur while serving a request
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// The request could not be understood.
    #[error("{0}")]
    BadRequest(String),

    /// Login refused.
    #[error("{}", .0.message())]
    Login(LoginFailure),

    /// The request carries no usable identity.
    #[error("{0}")]
    Unauthenticated(String),

    /// The caller's role does not allow the operation.
    #[error("{0}")]
    Forbidden(String),

    /// The addressed record does not exist.
    #[error("{entity} {id} not found")]
    NotFound {
        /// What was looked up
        entity: &'static str,
        /// The missing ID
        id: String,
    },

    /// Error from portaria-core
    #[error(transparent)]
    Core(#[from] portaria_core::Error),

    /// Error from portaria-backend
    #[error(transparent)]
    Backend(#[from] portaria_backend::Error),

    /// Listener I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Shorthand for [`Error::Forbidden`].
    pub fn forbidden(message: impl Into<String>) -> Self {
        Error::Forbidden(message.into())
    }

    /// Shorthand for [`Error::NotFound`].
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        Error::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    /// HTTP status for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::BadRequest(_) => StatusCode::BAD_REQUEST,
            Error::Login(_) | Error::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
            Error::Forbidden(_) => StatusCode::FORBIDDEN,
            Error::NotFound { .. } => StatusCode::NOT_FOUND,
            Error::Core(e) => core_status(e),
            Error::Backend(e) => match e {
                portaria_backend::Error::InvalidCredentials => StatusCode::UNAUTHORIZED,
                portaria_backend::Error::NotFound { .. } => StatusCode::NOT_FOUND,
                portaria_backend::Error::Core(core) => core_status(core),
                e if e.is_client_error() => StatusCode::UNPROCESSABLE_ENTITY,
                portaria_backend::Error::Token(_) => StatusCode::INTERNAL_SERVER_ERROR,
                _ => StatusCode::BAD_GATEWAY,
            },
            Error::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Error category reported to clients.
    pub fn category(&self) -> &'static str {
        match self {
            Error::BadRequest(_) => "request",
            Error::Login(_) | Error::Unauthenticated(_) => "authentication",
            Error::Forbidden(_) => "forbidden",
            Error::NotFound { .. } => "not_found",
            Error::Core(_) => "validation",
            Error::Backend(portaria_backend::Error::Core(_)) => "validation",
            Error::Backend(portaria_backend::Error::InvalidCredentials) => "authentication",
            Error::Backend(portaria_backend::Error::NotFound { .. }) => "not_found",
            Error::Backend(_) => "backend",
            Error::Io(_) => "internal",
        }
    }
}

fn core_status(err: &portaria_core::Error) -> StatusCode {
    match err {
        portaria_core::Error::Validation { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        e if e.is_client_error() => StatusCode::BAD_REQUEST,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(%status, error = %self, "request failed");
        } else {
            tracing::debug!(%status, error = %self, "request rejected");
        }

        if let Error::Login(reason) = &self {
            let body = serde_json::json!({
                "error": {
                    "category": self.category(),
                    "message": self.to_string(),
                    "reason": reason,
                }
            });
            return (status, Json(body)).into_response();
        }

        let message = match &self {
            Error::Io(_) => "internal error".to_string(),
            other => other.to_string(),
        };
        portaria_auth::error_response(status, self.category(), &message)
    }
}
