//! Authenticated user identity and extraction helpers.

/// An authenticated user identity, extracted from a validated token.
///
/// Stored in HTTP request extensions by the auth middleware.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    /// The login e-mail (`username@login-domain`).
    pub email: String,
    /// The identity provider's user ID (the `sub` claim).
    pub subject: String,
}

impl AuthenticatedUser {
    /// The username part of the login e-mail.
    pub fn username(&self) -> &str {
        self.email
            .rsplit_once('@')
            .map(|(local, _)| local)
            .unwrap_or(&self.email)
    }
}

/// Extract the `AuthenticatedUser` from HTTP request `Parts`, if present.
pub fn user_from_parts(parts: &http::request::Parts) -> Option<&AuthenticatedUser> {
    parts.extensions.get::<AuthenticatedUser>()
}
