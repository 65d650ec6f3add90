//! The signed-in caller and their role.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use uuid::Uuid;

use portaria_auth::user_from_parts;
use portaria_backend::ProfileStore;
use portaria_core::{Profile, Role, UserId};

use crate::{AppState, Error, Result};

/// Username reported for requests served with authentication disabled.
pub const DEV_USERNAME: &str = "dev";

/// The profile behind the current request.
///
/// Resolved on every request from the token subject, so role changes take
/// effect immediately. With authentication disabled the caller is an
/// administrator named [`DEV_USERNAME`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caller {
    /// The caller's profile.
    pub profile: Profile,
}

impl Caller {
    /// The caller's role.
    pub fn role(&self) -> Role {
        self.profile.role
    }

    /// Fails with 403 unless the caller may manage user accounts.
    pub fn require_user_admin(&self) -> Result<()> {
        self.require(self.role().can_manage_users(), "manage users")
    }

    /// Fails with 403 unless the caller may create, edit, or delete tickets.
    pub fn require_ticket_admin(&self) -> Result<()> {
        self.require(self.role().can_manage_tickets(), "manage services")
    }

    fn require(&self, allowed: bool, action: &str) -> Result<()> {
        if allowed {
            Ok(())
        } else {
            Err(Error::forbidden(format!(
                "role '{}' may not {action}",
                self.role()
            )))
        }
    }

    fn dev() -> Self {
        Self {
            profile: Profile {
                id: UserId::from_uuid(Uuid::nil()),
                username: DEV_USERNAME.to_string(),
                role: Role::Admin,
            },
        }
    }
}

impl FromRequestParts<AppState> for Caller {
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self> {
        let Some(user) = user_from_parts(parts) else {
            if state.auth_enabled {
                return Err(Error::Unauthenticated("missing credentials".to_string()));
            }
            return Ok(Self::dev());
        };

        let id: UserId = user
            .subject
            .parse()
            .map_err(|_| Error::Unauthenticated(format!("malformed subject '{}'", user.subject)))?;

        match state.backend.find_profile(id).await? {
            Some(profile) => Ok(Self { profile }),
            None => {
                tracing::warn!(user = %user.email, "authenticated user has no profile");
                Err(Error::forbidden("no profile for this account"))
            }
        }
    }
}
