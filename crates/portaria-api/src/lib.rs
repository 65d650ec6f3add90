//! # portaria-api
//!
//! HTTP API for the Portaria console.
//!
//! This crate provides the JSON API the console UI drives:
//! - Login and session lookup
//! - User administration (admin only)
//! - Room-access authorizations for a day, single and bulk
//! - Service tickets with date-derived status and per-desk scoping
//!
//! Every route except `/health` and `/api/login` sits behind
//! [`portaria_auth::AuthLayer`]; the caller's role is resolved per request
//! from the `profiles` table.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![forbid(unsafe_code)]

pub mod caller;
pub mod error;
pub mod extract;
pub mod routes;
pub mod server;
pub mod state;

pub use caller::Caller;
pub use error::{Error, LoginFailure, Result};
pub use server::{Server, router};
pub use state::AppState;
