//! Request authentication for the Portaria console.
//!
//! Provides:
//! - [`AuthenticatedUser`]: Identity extracted from a validated access token
//! - [`TokenValidator`]: Trait for async token validation (implement per provider)
//! - [`AuthLayer`] / [`AuthService`]: Tower middleware parameterised over `TokenValidator`
//! - [`AuthConfig`]: Configuration for the auth layer
//! - [`AuthError`]: Auth-specific error types

mod error;
mod middleware;
mod user;

pub use error::AuthError;
pub use middleware::{AuthLayer, AuthService, error_response};
pub use user::{AuthenticatedUser, user_from_parts};

/// Configuration for the auth middleware.
#[derive(Clone, Debug, Default)]
pub struct AuthConfig {
    /// Whether authentication is enabled. When false, all requests pass through.
    pub enabled: bool,
    /// Expected `aud` claim.
    pub audience: String,
    /// Allowed e-mail domain (the console's login domain). Empty means any domain.
    pub domain: String,
}

/// Trait for validating tokens and extracting user identity.
///
/// The middleware calls `validate()` with the bearer token and stores the
/// returned user in the request extensions.
pub trait TokenValidator: Send + Sync + 'static {
    /// Validate a token and return the authenticated user.
    fn validate(
        &self,
        token: &str,
        config: &AuthConfig,
    ) -> std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<AuthenticatedUser, AuthError>> + Send + '_>,
    >;
}
