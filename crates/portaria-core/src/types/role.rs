//! Console roles and what each one may do.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::Error;

/// The role attached to a user profile.
///
/// Wire values are the ones stored in the `profiles.role` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    /// Full access, including user management.
    #[serde(rename = "admin")]
    Admin,
    /// Maintenance desk.
    #[serde(rename = "manutencao")]
    Maintenance,
    /// Reception desk.
    #[serde(rename = "recepcao")]
    Reception,
}

impl Role {
    /// Every role, in display order.
    pub const ALL: [Role; 3] = [Role::Admin, Role::Maintenance, Role::Reception];

    /// The value stored in the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Maintenance => "manutencao",
            Role::Reception => "recepcao",
        }
    }

    /// Human-readable label.
    pub fn display_name(&self) -> &'static str {
        match self {
            Role::Admin => "Admin",
            Role::Maintenance => "Manutenção",
            Role::Reception => "Recepção",
        }
    }

    /// Returns `true` for [`Role::Admin`].
    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }

    /// Where the user lands after signing in.
    pub fn landing_path(&self) -> &'static str {
        match self {
            Role::Admin => "/admin",
            Role::Maintenance | Role::Reception => "/services",
        }
    }

    /// Whether the role may create, edit, or delete service tickets.
    pub fn can_manage_tickets(&self) -> bool {
        self.is_admin()
    }

    /// Whether the role may manage other users.
    pub fn can_manage_users(&self) -> bool {
        self.is_admin()
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = s.trim().to_lowercase();
        Role::ALL
            .into_iter()
            .find(|role| role.as_str() == value)
            .ok_or_else(|| Error::UnknownRole {
                value: s.to_string(),
            })
    }
}
