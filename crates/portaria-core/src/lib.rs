#![forbid(unsafe_code)]
#![warn(missing_docs)]

//! Portaria Core
//!
//! Domain types and the small amount of real logic behind the console:
//! ticket status derivation, search filters, bulk authorization parsing,
//! input validation, and configuration loading.
//!
//! # Modules
//!
//! - [`error`]: Error types and Result alias
//! - [`types`]: Roles, profiles, authorizations, and service tickets
//! - [`filter`]: Free-text search over listings
//! - [`bulk`]: Bulk authorization import parsing
//! - [`clock`]: Timezone-aware "today"
//! - [`catalog`]: Known service kinds and categories
//! - [`config`]: Console configuration

pub mod bulk;
pub mod catalog;
pub mod clock;
pub mod config;
pub mod error;
pub mod filter;
pub mod types;

// Re-exports for convenience
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::PortariaConfig;
pub use error::{Error, Result};
pub use types::{
    AccessLevel, AuthorizationChanges, AuthorizationInput, AuthorizedPerson, NewAuthorization,
    NewTicket, NewUser, Profile, Role, RoomList, ServiceTicket, TicketFields, TicketInput,
    TicketStatus, UserId, login_email, validate_password,
};
