//! Shared handler state.

use std::sync::Arc;

use portaria_backend::Backend;
use portaria_core::Clock;

/// State handed to every handler.
#[derive(Clone)]
pub struct AppState {
    /// Identity provider and tables.
    pub backend: Arc<dyn Backend>,
    /// Source of "today".
    pub clock: Arc<dyn Clock>,
    /// Domain appended to usernames to form login e-mails.
    pub login_domain: String,
    /// Whether requests must carry a bearer token.
    pub auth_enabled: bool,
}

impl AppState {
    /// Creates state with authentication enabled.
    pub fn new(
        backend: Arc<dyn Backend>,
        clock: Arc<dyn Clock>,
        login_domain: impl Into<String>,
    ) -> Self {
        Self {
            backend,
            clock,
            login_domain: login_domain.into(),
            auth_enabled: true,
        }
    }

    /// Sets whether authentication is enforced.
    pub fn with_auth_enabled(mut self, enabled: bool) -> Self {
        self.auth_enabled = enabled;
        self
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("login_domain", &self.login_domain)
            .field("auth_enabled", &self.auth_enabled)
            .finish_non_exhaustive()
    }
}
