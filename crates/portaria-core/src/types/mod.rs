//! Domain types for the console.

mod authorization;
mod profile;
mod proptests;
mod role;
mod ticket;

pub use authorization::{
    AccessLevel, AuthorizationChanges, AuthorizationInput, AuthorizedPerson, NewAuthorization,
    RoomList,
};
pub use profile::{MIN_PASSWORD_LEN, NewUser, Profile, UserId, login_email, validate_password};
pub use role::Role;
pub use ticket::{NewTicket, ServiceTicket, TicketFields, TicketInput, TicketStatus};

use chrono::NaiveDate;

use crate::{Error, Result};

/// Parses a `YYYY-MM-DD` calendar date.
pub fn parse_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| Error::InvalidDate {
        value: value.to_string(),
    })
}

/// Trims a required text field, rejecting it when nothing is left.
pub(crate) fn required(field: &str, value: String) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(Error::validation_field(field, "must not be empty"));
    }
    Ok(trimmed.to_string())
}
