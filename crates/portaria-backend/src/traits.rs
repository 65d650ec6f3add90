//! Store traits, one per backend concern.
//!
//! Each method is a single request/response call. Ordering and filtering
//! that the provider can do (by date, by username) happen provider-side.

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use portaria_core::{
    AuthorizationChanges, AuthorizedPerson, NewAuthorization, NewTicket, Profile, ServiceTicket,
    TicketFields, TicketStatus, UserId,
};

use crate::Result;

/// A signed-in session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Bearer token for subsequent requests.
    pub access_token: String,
    /// Lifetime of the token in seconds.
    pub expires_in: u64,
    /// The signed-in user.
    pub user_id: UserId,
}

/// Identity provider: credentials and accounts.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Signs in with e-mail and password.
    async fn sign_in_with_password(&self, email: &str, password: &str) -> Result<Session>;

    /// Creates a pre-confirmed account and returns its ID.
    async fn create_user(&self, email: &str, password: &str) -> Result<UserId>;

    /// Deletes an account.
    async fn delete_user(&self, id: UserId) -> Result<()>;

    /// Replaces an account's password.
    async fn update_password(&self, id: UserId, password: &str) -> Result<()>;
}

/// The `profiles` table.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Looks a profile up by username.
    async fn find_profile_by_username(&self, username: &str) -> Result<Option<Profile>>;

    /// Looks a profile up by user ID.
    async fn find_profile(&self, id: UserId) -> Result<Option<Profile>>;

    /// All profiles, ordered by username.
    async fn list_profiles(&self) -> Result<Vec<Profile>>;

    /// Inserts a profile.
    async fn insert_profile(&self, profile: &Profile) -> Result<()>;

    /// Deletes a profile. Deleting a missing profile is not an error.
    async fn delete_profile(&self, id: UserId) -> Result<()>;
}

/// The `authorized_people` table.
#[async_trait]
pub trait AuthorizationStore: Send + Sync {
    /// Authorizations for `date`, newest first.
    async fn list_authorizations(&self, date: NaiveDate) -> Result<Vec<AuthorizedPerson>>;

    /// Inserts one or more rows in a single call and returns them.
    async fn insert_authorizations(
        &self,
        rows: &[NewAuthorization],
    ) -> Result<Vec<AuthorizedPerson>>;

    /// Replaces name, CPF, and rooms of a row.
    async fn update_authorization(
        &self,
        id: i64,
        changes: &AuthorizationChanges,
    ) -> Result<AuthorizedPerson>;

    /// Deletes a row.
    async fn delete_authorization(&self, id: i64) -> Result<()>;
}

/// The `services` table.
#[async_trait]
pub trait TicketStore: Send + Sync {
    /// Tickets for `date`, newest first, with their stored status.
    async fn list_tickets(&self, date: NaiveDate) -> Result<Vec<ServiceTicket>>;

    /// One ticket by ID.
    async fn get_ticket(&self, id: i64) -> Result<Option<ServiceTicket>>;

    /// Inserts a ticket and returns it.
    async fn insert_ticket(&self, ticket: &NewTicket) -> Result<ServiceTicket>;

    /// Replaces the editable fields of a ticket.
    async fn update_ticket(&self, id: i64, fields: &TicketFields) -> Result<ServiceTicket>;

    /// Stores a new status.
    async fn set_ticket_status(&self, id: i64, status: TicketStatus) -> Result<ServiceTicket>;

    /// Deletes a ticket.
    async fn delete_ticket(&self, id: i64) -> Result<()>;
}

/// Everything the console needs from a backend.
pub trait Backend: IdentityProvider + ProfileStore + AuthorizationStore + TicketStore {}

impl<T> Backend for T where T: IdentityProvider + ProfileStore + AuthorizationStore + TicketStore {}
