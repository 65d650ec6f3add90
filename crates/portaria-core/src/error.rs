//! Error types for portaria-core.

use std::path::{Path, PathBuf};

/// Errors raised by domain validation and configuration handling.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// Input failed validation.
    #[error("Validation error: {message}")]
    Validation {
        /// Field that failed validation, when known
        field: Option<String>,
        /// What went wrong
        message: String,
    },

    /// A role name that is not one of the known roles.
    #[error("Unknown role: {value}")]
    UnknownRole {
        /// The rejected value
        value: String,
    },

    /// A ticket status that is not one of the known statuses.
    #[error("Unknown ticket status: {value}")]
    UnknownStatus {
        /// The rejected value
        value: String,
    },

    /// A calendar date that is not `YYYY-MM-DD`.
    #[error("Invalid date '{value}': expected YYYY-MM-DD")]
    InvalidDate {
        /// The rejected value
        value: String,
    },

    /// Configuration error
    #[error("Configuration error: {message}")]
    Config {
        /// What configuration is problematic
        message: String,
    },

    /// I/O error on a specific path.
    #[error("I/O error on {path}: {source}")]
    Io {
        /// Path being read or written
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },
}

/// Convenience `Result` type alias for portaria-core operations.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Creates a new validation error.
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Error::Validation {
            field: None,
            message: message.into(),
        }
    }

    /// Creates a new validation error with a field name.
    pub fn validation_field<F, M>(field: F, message: M) -> Self
    where
        F: Into<String>,
        M: Into<String>,
    {
        Error::Validation {
            field: Some(field.into()),
            message: message.into(),
        }
    }

    /// Creates a new configuration error.
    pub fn config<S: Into<String>>(message: S) -> Self {
        Error::Config {
            message: message.into(),
        }
    }

    /// Wraps an I/O error with the path it happened on.
    pub fn io_with_path(source: std::io::Error, path: impl AsRef<Path>) -> Self {
        Error::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// Whether the error was caused by caller input (as opposed to the environment).
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Error::Validation { .. }
                | Error::UnknownRole { .. }
                | Error::UnknownStatus { .. }
                | Error::InvalidDate { .. }
        )
    }
}
