//! Room-access authorizations.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::required;
use crate::{Error, Result};

/// Access level of an authorized person.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccessLevel {
    /// Regular authorization.
    #[default]
    Active,
    /// Flagged for priority handling at the desk.
    Priority,
}

/// A row of the `authorized_people` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthorizedPerson {
    /// Row ID.
    pub id: i64,
    /// Full name.
    pub name: String,
    /// Brazilian taxpayer number, kept as typed.
    pub cpf: String,
    /// Rooms the person may enter.
    pub rooms: Vec<String>,
    /// Access level.
    #[serde(default)]
    pub status: AccessLevel,
    /// Day the authorization is valid for.
    pub date: NaiveDate,
    /// Insertion time.
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Ordered set of room names.
///
/// Names are trimmed; blanks and duplicates are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoomList(Vec<String>);

impl RoomList {
    /// Creates an empty list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a room. Returns `false` if it was blank or already present.
    pub fn add(&mut self, room: &str) -> bool {
        let room = room.trim();
        if room.is_empty() || self.0.iter().any(|r| r == room) {
            return false;
        }
        self.0.push(room.to_string());
        true
    }

    /// Removes a room. Returns `false` if it was not present.
    pub fn remove(&mut self, room: &str) -> bool {
        let before = self.0.len();
        self.0.retain(|r| r != room.trim());
        self.0.len() != before
    }

    /// Whether no room has been added.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Rooms in insertion order.
    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    /// Consumes the list.
    pub fn into_vec(self) -> Vec<String> {
        self.0
    }
}

impl<S: AsRef<str>> FromIterator<S> for RoomList {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut rooms = RoomList::new();
        for room in iter {
            rooms.add(room.as_ref());
        }
        rooms
    }
}

/// Add/edit form for one person, before validation.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuthorizationInput {
    /// Full name.
    #[serde(default)]
    pub name: String,
    /// CPF.
    #[serde(default)]
    pub cpf: String,
    /// Rooms.
    #[serde(default)]
    pub rooms: Vec<String>,
}

impl AuthorizationInput {
    /// Validates an edit: name, CPF, and at least one room.
    pub fn validate_changes(self) -> Result<AuthorizationChanges> {
        let name = required("name", self.name)?;
        let cpf = required("cpf", self.cpf)?;
        let rooms: RoomList = self.rooms.iter().collect();
        if rooms.is_empty() {
            return Err(Error::validation_field("rooms", "at least one room is required"));
        }
        Ok(AuthorizationChanges {
            name,
            cpf,
            rooms: rooms.into_vec(),
        })
    }

    /// Validates a new authorization for `date`.
    pub fn validate(self, date: NaiveDate) -> Result<NewAuthorization> {
        let changes = self.validate_changes()?;
        Ok(NewAuthorization::from_changes(changes, date))
    }
}

/// Fields an edit may change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthorizationChanges {
    /// Full name.
    pub name: String,
    /// CPF.
    pub cpf: String,
    /// Rooms.
    pub rooms: Vec<String>,
}

/// Insert body for a new authorization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewAuthorization {
    /// Full name.
    pub name: String,
    /// CPF.
    pub cpf: String,
    /// Rooms.
    pub rooms: Vec<String>,
    /// Always [`AccessLevel::Active`] on creation.
    pub status: AccessLevel,
    /// Day the authorization is valid for.
    pub date: NaiveDate,
}

impl NewAuthorization {
    /// Builds an insert body from validated fields.
    pub fn from_changes(changes: AuthorizationChanges, date: NaiveDate) -> Self {
        Self {
            name: changes.name,
            cpf: changes.cpf,
            rooms: changes.rooms,
            status: AccessLevel::Active,
            date,
        }
    }
}
