//! User profiles and account creation input.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use super::{Role, required};
use crate::{Error, Result};

/// Minimum accepted password length.
pub const MIN_PASSWORD_LEN: usize = 6;

/// Identifier of an identity-provider user; also the primary key of its profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(Uuid);

impl UserId {
    /// Creates a new random user ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a user ID from a UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the inner UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for UserId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Uuid> for UserId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl std::str::FromStr for UserId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// A row of the `profiles` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    /// Same ID as the identity-provider user.
    pub id: UserId,
    /// Login name.
    pub username: String,
    /// Console role.
    pub role: Role,
}

/// Input for creating a user account.
#[derive(Debug, Clone, Deserialize)]
pub struct NewUser {
    /// Login name; becomes the local part of the login e-mail.
    pub username: String,
    /// Initial password.
    pub password: String,
    /// Console role.
    pub role: Role,
}

impl NewUser {
    /// Checks the username and password, returning the normalized username.
    pub fn validate(&self) -> Result<String> {
        let username = required("username", self.username.clone())?;
        if username.chars().any(|c| c.is_whitespace() || c == '@') {
            return Err(Error::validation_field(
                "username",
                "must not contain spaces or '@'",
            ));
        }
        validate_password(&self.password)?;
        Ok(username)
    }
}

/// Rejects passwords shorter than [`MIN_PASSWORD_LEN`] characters.
pub fn validate_password(password: &str) -> Result<()> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(Error::validation_field(
            "password",
            format!("must be at least {MIN_PASSWORD_LEN} characters"),
        ));
    }
    Ok(())
}

/// The e-mail the identity provider knows a username by.
pub fn login_email(username: &str, domain: &str) -> String {
    format!("{}@{domain}", username.trim())
}
