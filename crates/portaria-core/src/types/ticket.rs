//! Maintenance and reception service tickets.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

use super::required;
use crate::{Error, Result};

/// Lifecycle status of a service ticket.
///
/// Only [`TicketStatus::Completed`] is authoritative in storage; open and
/// pending are recomputed from the ticket date, see [`TicketStatus::derive`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum TicketStatus {
    /// Scheduled for today or later.
    Open,
    /// Scheduled before today and not yet done.
    Pending,
    /// Done.
    Completed,
}

impl TicketStatus {
    /// The value stored in the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            TicketStatus::Open => "aberto",
            TicketStatus::Pending => "pendente",
            TicketStatus::Completed => "concluido",
        }
    }

    /// Returns `true` if the ticket is done.
    pub fn is_completed(&self) -> bool {
        matches!(self, TicketStatus::Completed)
    }

    /// Reads a status column value.
    ///
    /// Unlike [`FromStr`], anything unrecognized counts as not completed, so
    /// [`TicketStatus::derive`] recomputes it from the date.
    pub fn from_stored(value: &str) -> TicketStatus {
        value.parse().unwrap_or_else(|_| {
            log::debug!("Treating unknown stored status '{value}' as open");
            TicketStatus::Open
        })
    }

    /// Computes the status to show for a ticket scheduled on `date`.
    ///
    /// A completed ticket stays completed whatever its date. Otherwise a date
    /// before `today` is pending, and today or later is open.
    pub fn derive(stored: TicketStatus, date: NaiveDate, today: NaiveDate) -> TicketStatus {
        if stored.is_completed() {
            return TicketStatus::Completed;
        }
        if date < today {
            TicketStatus::Pending
        } else {
            TicketStatus::Open
        }
    }
}

impl fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TicketStatus {
    type Err = Error;

    // Rows written by older forms carry capitalized values ("Aberto").
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "aberto" => Ok(TicketStatus::Open),
            "pendente" => Ok(TicketStatus::Pending),
            "concluido" | "concluído" => Ok(TicketStatus::Completed),
            _ => Err(Error::UnknownStatus {
                value: s.to_string(),
            }),
        }
    }
}

impl TryFrom<String> for TicketStatus {
    type Error = Error;

    fn try_from(value: String) -> std::result::Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<TicketStatus> for String {
    fn from(status: TicketStatus) -> Self {
        status.as_str().to_string()
    }
}

/// A row of the `services` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceTicket {
    /// Row ID.
    pub id: i64,
    /// Short description.
    pub title: String,
    /// Person in charge.
    pub responsible: String,
    /// Service kind (see [`crate::catalog`]).
    pub service: String,
    /// Owning desk.
    pub category: String,
    /// Scheduled day.
    pub date: NaiveDate,
    /// Stored status.
    #[serde(deserialize_with = "stored_status")]
    pub status: TicketStatus,
    /// Insertion time.
    pub created_at: DateTime<Utc>,
}

fn stored_status<'de, D>(deserializer: D) -> std::result::Result<TicketStatus, D::Error>
where
    D: Deserializer<'de>,
{
    let value = String::deserialize(deserializer)?;
    Ok(TicketStatus::from_stored(&value))
}

impl ServiceTicket {
    /// Replaces the stored status with the one derived for `today`.
    pub fn with_derived_status(mut self, today: NaiveDate) -> Self {
        self.status = TicketStatus::derive(self.status, self.date, today);
        self
    }
}

/// Create/edit form for a ticket, before validation.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TicketInput {
    /// Short description.
    #[serde(default)]
    pub title: String,
    /// Person in charge.
    #[serde(default)]
    pub responsible: String,
    /// Service kind.
    #[serde(default)]
    pub service: String,
    /// Owning desk.
    #[serde(default)]
    pub category: String,
    /// Scheduled day; defaults to today.
    #[serde(default)]
    pub date: Option<NaiveDate>,
}

impl TicketInput {
    /// Validates the form. Every text field is required.
    pub fn validate(self, today: NaiveDate) -> Result<TicketFields> {
        Ok(TicketFields {
            title: required("title", self.title)?,
            responsible: required("responsible", self.responsible)?,
            service: required("service", self.service)?,
            category: required("category", self.category)?,
            date: self.date.unwrap_or(today),
        })
    }
}

/// Validated, editable ticket fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketFields {
    /// Short description.
    pub title: String,
    /// Person in charge.
    pub responsible: String,
    /// Service kind.
    pub service: String,
    /// Owning desk.
    pub category: String,
    /// Scheduled day.
    pub date: NaiveDate,
}

/// Insert body for a new ticket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewTicket {
    /// Validated fields.
    #[serde(flatten)]
    pub fields: TicketFields,
    /// Always [`TicketStatus::Open`] on creation.
    pub status: TicketStatus,
}

impl From<TicketFields> for NewTicket {
    fn from(fields: TicketFields) -> Self {
        Self {
            fields,
            status: TicketStatus::Open,
        }
    }
}
