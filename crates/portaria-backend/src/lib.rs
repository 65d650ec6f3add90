//! # portaria-backend
//!
//! Access to the hosted backend behind the console.
//!
//! The console owns no storage: identities live in the provider's auth
//! service and records live in three tables (`profiles`,
//! `authorized_people`, `services`). This crate provides:
//! - Store traits, one per concern ([`traits`])
//! - [`SupabaseBackend`], the hosted implementation over HTTP
//! - [`MemoryBackend`], an in-process implementation for development and tests

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod memory;
pub mod supabase;
pub mod traits;

pub use error::{Error, Result};
pub use memory::MemoryBackend;
pub use supabase::SupabaseBackend;
pub use traits::{
    AuthorizationStore, Backend, IdentityProvider, ProfileStore, Session, TicketStore,
};
