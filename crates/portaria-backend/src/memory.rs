//! In-process backend.
//!
//! Keeps the three tables and the account list in memory and signs access
//! tokens in the hosted provider's format, so the same token validator works
//! against either backend. Passwords are stored as salted blake3 digests.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use tokio::sync::RwLock;
use uuid::Uuid;

use portaria_auth_supabase::{AccessClaims, issue_access_token};
use portaria_core::{
    AuthorizationChanges, AuthorizedPerson, Clock, NewAuthorization, NewTicket, Profile,
    ServiceTicket, TicketFields, TicketStatus, UserId,
};

use crate::traits::{AuthorizationStore, IdentityProvider, ProfileStore, Session, TicketStore};
use crate::{Error, Result};

/// Lifetime of issued access tokens.
pub const TOKEN_TTL_SECS: u64 = 3600;

struct Account {
    email: String,
    salt: Uuid,
    digest: blake3::Hash,
}

impl Account {
    fn new(email: &str, password: &str) -> Self {
        let salt = Uuid::new_v4();
        Self {
            email: email.to_string(),
            salt,
            digest: digest(&salt, password),
        }
    }

    fn verify(&self, password: &str) -> bool {
        // blake3::Hash equality is constant-time
        digest(&self.salt, password) == self.digest
    }
}

fn digest(salt: &Uuid, password: &str) -> blake3::Hash {
    let mut hasher = blake3::Hasher::new();
    hasher.update(salt.as_bytes());
    hasher.update(password.as_bytes());
    hasher.finalize()
}

#[derive(Default)]
struct Tables {
    accounts: HashMap<UserId, Account>,
    profiles: HashMap<UserId, Profile>,
    people: BTreeMap<i64, AuthorizedPerson>,
    tickets: BTreeMap<i64, ServiceTicket>,
    last_person_id: i64,
    last_ticket_id: i64,
}

/// In-process backend for development and tests.
pub struct MemoryBackend {
    tables: RwLock<Tables>,
    clock: Arc<dyn Clock>,
    jwt_secret: String,
    audience: String,
}

impl MemoryBackend {
    /// Creates an empty backend that signs tokens with `jwt_secret`.
    pub fn new(clock: Arc<dyn Clock>, jwt_secret: impl Into<String>, audience: impl Into<String>) -> Self {
        Self {
            tables: RwLock::new(Tables::default()),
            clock,
            jwt_secret: jwt_secret.into(),
            audience: audience.into(),
        }
    }
}

/// Newest first; rows inserted in the same instant fall back to insertion order.
fn newest_first<T>(rows: &mut [T], key: impl Fn(&T) -> (Option<chrono::DateTime<chrono::Utc>>, i64)) {
    rows.sort_by(|a, b| key(b).cmp(&key(a)));
}

#[async_trait]
impl IdentityProvider for MemoryBackend {
    async fn sign_in_with_password(&self, email: &str, password: &str) -> Result<Session> {
        let tables = self.tables.read().await;
        let (id, _) = tables
            .accounts
            .iter()
            .find(|(_, account)| account.email.eq_ignore_ascii_case(email))
            .filter(|(_, account)| account.verify(password))
            .ok_or(Error::InvalidCredentials)?;

        let claims = AccessClaims::for_user(&id.to_string(), email, &self.audience, TOKEN_TTL_SECS);
        Ok(Session {
            access_token: issue_access_token(&claims, &self.jwt_secret)?,
            expires_in: TOKEN_TTL_SECS,
            user_id: *id,
        })
    }

    async fn create_user(&self, email: &str, password: &str) -> Result<UserId> {
        let mut tables = self.tables.write().await;
        if tables
            .accounts
            .values()
            .any(|account| account.email.eq_ignore_ascii_case(email))
        {
            return Err(Error::Provider {
                status: 422,
                message: "A user with this email address has already been registered".to_string(),
            });
        }
        let id = UserId::new();
        tables.accounts.insert(id, Account::new(email, password));
        log::debug!("Created account {id} for {email}");
        Ok(id)
    }

    async fn delete_user(&self, id: UserId) -> Result<()> {
        let mut tables = self.tables.write().await;
        tables
            .accounts
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| Error::not_found("user", id))
    }

    async fn update_password(&self, id: UserId, password: &str) -> Result<()> {
        let mut tables = self.tables.write().await;
        let account = tables
            .accounts
            .get_mut(&id)
            .ok_or_else(|| Error::not_found("user", id))?;
        *account = Account::new(&account.email, password);
        Ok(())
    }
}

#[async_trait]
impl ProfileStore for MemoryBackend {
    async fn find_profile_by_username(&self, username: &str) -> Result<Option<Profile>> {
        let tables = self.tables.read().await;
        Ok(tables
            .profiles
            .values()
            .find(|p| p.username == username)
            .cloned())
    }

    async fn find_profile(&self, id: UserId) -> Result<Option<Profile>> {
        Ok(self.tables.read().await.profiles.get(&id).cloned())
    }

    async fn list_profiles(&self) -> Result<Vec<Profile>> {
        let mut profiles: Vec<Profile> =
            self.tables.read().await.profiles.values().cloned().collect();
        profiles.sort_by(|a, b| a.username.cmp(&b.username));
        Ok(profiles)
    }

    async fn insert_profile(&self, profile: &Profile) -> Result<()> {
        let mut tables = self.tables.write().await;
        if tables
            .profiles
            .values()
            .any(|p| p.username == profile.username)
        {
            return Err(Error::Provider {
                status: 409,
                message: "duplicate key value violates unique constraint \"profiles_username_key\""
                    .to_string(),
            });
        }
        tables.profiles.insert(profile.id, profile.clone());
        Ok(())
    }

    async fn delete_profile(&self, id: UserId) -> Result<()> {
        self.tables.write().await.profiles.remove(&id);
        Ok(())
    }
}

#[async_trait]
impl AuthorizationStore for MemoryBackend {
    async fn list_authorizations(&self, date: NaiveDate) -> Result<Vec<AuthorizedPerson>> {
        let mut rows: Vec<AuthorizedPerson> = self
            .tables
            .read()
            .await
            .people
            .values()
            .filter(|p| p.date == date)
            .cloned()
            .collect();
        newest_first(&mut rows, |p| (p.created_at, p.id));
        Ok(rows)
    }

    async fn insert_authorizations(
        &self,
        rows: &[NewAuthorization],
    ) -> Result<Vec<AuthorizedPerson>> {
        let now = self.clock.now();
        let mut tables = self.tables.write().await;
        let mut inserted = Vec::with_capacity(rows.len());
        for row in rows {
            tables.last_person_id += 1;
            let person = AuthorizedPerson {
                id: tables.last_person_id,
                name: row.name.clone(),
                cpf: row.cpf.clone(),
                rooms: row.rooms.clone(),
                status: row.status,
                date: row.date,
                created_at: Some(now),
            };
            tables.people.insert(person.id, person.clone());
            inserted.push(person);
        }
        Ok(inserted)
    }

    async fn update_authorization(
        &self,
        id: i64,
        changes: &AuthorizationChanges,
    ) -> Result<AuthorizedPerson> {
        let mut tables = self.tables.write().await;
        let person = tables
            .people
            .get_mut(&id)
            .ok_or_else(|| Error::not_found("authorization", id))?;
        person.name = changes.name.clone();
        person.cpf = changes.cpf.clone();
        person.rooms = changes.rooms.clone();
        Ok(person.clone())
    }

    async fn delete_authorization(&self, id: i64) -> Result<()> {
        self.tables
            .write()
            .await
            .people
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| Error::not_found("authorization", id))
    }
}

#[async_trait]
impl TicketStore for MemoryBackend {
    async fn list_tickets(&self, date: NaiveDate) -> Result<Vec<ServiceTicket>> {
        let mut rows: Vec<ServiceTicket> = self
            .tables
            .read()
            .await
            .tickets
            .values()
            .filter(|t| t.date == date)
            .cloned()
            .collect();
        newest_first(&mut rows, |t| (Some(t.created_at), t.id));
        Ok(rows)
    }

    async fn get_ticket(&self, id: i64) -> Result<Option<ServiceTicket>> {
        Ok(self.tables.read().await.tickets.get(&id).cloned())
    }

    async fn insert_ticket(&self, ticket: &NewTicket) -> Result<ServiceTicket> {
        let now = self.clock.now();
        let mut tables = self.tables.write().await;
        tables.last_ticket_id += 1;
        let fields = ticket.fields.clone();
        let row = ServiceTicket {
            id: tables.last_ticket_id,
            title: fields.title,
            responsible: fields.responsible,
            service: fields.service,
            category: fields.category,
            date: fields.date,
            status: ticket.status,
            created_at: now,
        };
        tables.tickets.insert(row.id, row.clone());
        Ok(row)
    }

    async fn update_ticket(&self, id: i64, fields: &TicketFields) -> Result<ServiceTicket> {
        let mut tables = self.tables.write().await;
        let row = tables
            .tickets
            .get_mut(&id)
            .ok_or_else(|| Error::not_found("service", id))?;
        row.title = fields.title.clone();
        row.responsible = fields.responsible.clone();
        row.service = fields.service.clone();
        row.category = fields.category.clone();
        row.date = fields.date;
        Ok(row.clone())
    }

    async fn set_ticket_status(&self, id: i64, status: TicketStatus) -> Result<ServiceTicket> {
        let mut tables = self.tables.write().await;
        let row = tables
            .tickets
            .get_mut(&id)
            .ok_or_else(|| Error::not_found("service", id))?;
        row.status = status;
        Ok(row.clone())
    }

    async fn delete_ticket(&self, id: i64) -> Result<()> {
        self.tables
            .write()
            .await
            .tickets
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| Error::not_found("service", id))
    }
}
