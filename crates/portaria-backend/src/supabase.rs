//! Hosted backend over the Supabase HTTP APIs.
//!
//! Accounts go through the auth (GoTrue) endpoints under `/auth/v1`, tables
//! through PostgREST under `/rest/v1`. Administrative calls and table access
//! use the service-role key; password sign-in uses the anon key. Provider
//! errors are returned verbatim and never retried.

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::{Method, RequestBuilder, Response, StatusCode, Url};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::json;

use portaria_core::config::BackendConfig;
use portaria_core::{
    AuthorizationChanges, AuthorizedPerson, NewAuthorization, NewTicket, Profile, ServiceTicket,
    TicketFields, TicketStatus, UserId,
};

use crate::traits::{AuthorizationStore, IdentityProvider, ProfileStore, Session, TicketStore};
use crate::{Error, Result};

const PROFILES: &str = "profiles";
const AUTHORIZATIONS: &str = "authorized_people";
const SERVICES: &str = "services";

const RETURN_REPRESENTATION: &str = "return=representation";
const RETURN_MINIMAL: &str = "return=minimal";

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: u64,
    user: GoTrueUser,
}

#[derive(Debug, Deserialize)]
struct GoTrueUser {
    id: UserId,
}

/// Client for a Supabase project.
#[derive(Clone)]
pub struct SupabaseBackend {
    base_url: Url,
    anon_key: String,
    service_role_key: String,
    client: reqwest::Client,
}

impl std::fmt::Debug for SupabaseBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SupabaseBackend")
            .field("base_url", &self.base_url.as_str())
            .finish_non_exhaustive()
    }
}

impl SupabaseBackend {
    /// Creates a client for the project at `url`.
    pub fn new(
        url: &str,
        anon_key: impl Into<String>,
        service_role_key: impl Into<String>,
    ) -> Result<Self> {
        let base_url = Url::parse(url.trim_end_matches('/')).map_err(|e| {
            portaria_core::Error::config(format!("invalid backend url '{url}': {e}"))
        })?;
        Ok(Self {
            base_url,
            anon_key: anon_key.into(),
            service_role_key: service_role_key.into(),
            client: reqwest::Client::new(),
        })
    }

    /// Creates a client from the `[backend]` config section.
    pub fn from_config(config: &BackendConfig) -> Result<Self> {
        let missing = |key: &str| portaria_core::Error::config(format!("backend.{key} is required"));
        let url = config.url.as_deref().ok_or_else(|| missing("url"))?;
        let anon_key = config.anon_key.clone().ok_or_else(|| missing("anon_key"))?;
        let service_role_key = config
            .service_role_key
            .clone()
            .ok_or_else(|| missing("service_role_key"))?;
        Self::new(url, anon_key, service_role_key)
    }

    fn endpoint(&self, path: &str, query: &[(&str, String)]) -> Url {
        let mut url = self.base_url.clone();
        let base = url.path().trim_end_matches('/').to_string();
        url.set_path(&format!("{base}{path}"));
        if !query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in query {
                pairs.append_pair(key, value);
            }
        }
        url
    }

    fn admin(&self, method: Method, path: &str) -> RequestBuilder {
        self.client
            .request(method, self.endpoint(path, &[]))
            .header("apikey", &self.service_role_key)
            .bearer_auth(&self.service_role_key)
    }

    fn rest(&self, method: Method, table: &str, query: &[(&str, String)]) -> RequestBuilder {
        self.client
            .request(method, self.endpoint(&format!("/rest/v1/{table}"), query))
            .header("apikey", &self.service_role_key)
            .bearer_auth(&self.service_role_key)
    }

    async fn select<T: DeserializeOwned>(
        &self,
        table: &str,
        query: &[(&str, String)],
    ) -> Result<Vec<T>> {
        let response = send(self.rest(Method::GET, table, query)).await?;
        read_json(response).await
    }

    async fn select_one<T: DeserializeOwned>(
        &self,
        table: &str,
        query: &[(&str, String)],
    ) -> Result<Option<T>> {
        let mut query = query.to_vec();
        query.push(("limit", "1".to_string()));
        let rows: Vec<T> = self.select(table, &query).await?;
        Ok(rows.into_iter().next())
    }

    /// PATCH one row by ID and return it.
    async fn patch_row<T: DeserializeOwned>(
        &self,
        table: &'static str,
        entity: &'static str,
        id: i64,
        body: serde_json::Value,
    ) -> Result<T> {
        let request = self
            .rest(Method::PATCH, table, &[("id", eq(id))])
            .header("Prefer", RETURN_REPRESENTATION)
            .json(&body);
        let rows: Vec<T> = read_json(send(request).await?).await?;
        rows.into_iter()
            .next()
            .ok_or_else(|| Error::not_found(entity, id))
    }

    /// DELETE one row by ID; a filter matching nothing is reported as not found.
    async fn delete_row(&self, table: &'static str, entity: &'static str, id: i64) -> Result<()> {
        let request = self
            .rest(Method::DELETE, table, &[("id", eq(id)), ("select", "id".into())])
            .header("Prefer", RETURN_REPRESENTATION);
        let rows: Vec<serde_json::Value> = read_json(send(request).await?).await?;
        if rows.is_empty() {
            return Err(Error::not_found(entity, id));
        }
        Ok(())
    }
}

fn eq(value: impl std::fmt::Display) -> String {
    format!("eq.{value}")
}

/// Sends a request and turns non-2xx answers into [`Error::Provider`].
async fn send(request: RequestBuilder) -> Result<Response> {
    let response = request.send().await?;
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    let message = provider_message(status, &body);
    log::warn!("Backend returned HTTP {status}: {message}");
    Err(Error::Provider {
        status: status.as_u16(),
        message,
    })
}

async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T> {
    let body = response.bytes().await?;
    serde_json::from_slice(&body).map_err(|e| Error::Decode(e.to_string()))
}

/// Picks the human-readable message out of a provider error body.
///
/// GoTrue uses `msg` or `error_description`; PostgREST uses `message`.
fn provider_message(status: StatusCode, body: &str) -> String {
    if let Ok(serde_json::Value::Object(fields)) = serde_json::from_str(body) {
        for key in ["message", "msg", "error_description", "error"] {
            if let Some(serde_json::Value::String(message)) = fields.get(key) {
                return message.clone();
            }
        }
    }
    let body = body.trim();
    if body.is_empty() {
        status
            .canonical_reason()
            .unwrap_or("request failed")
            .to_string()
    } else {
        body.to_string()
    }
}

fn map_missing_user(err: Error, id: UserId) -> Error {
    match err {
        Error::Provider { status: 404, .. } => Error::not_found("user", id),
        other => other,
    }
}

#[async_trait]
impl IdentityProvider for SupabaseBackend {
    async fn sign_in_with_password(&self, email: &str, password: &str) -> Result<Session> {
        let request = self
            .client
            .post(self.endpoint(
                "/auth/v1/token",
                &[("grant_type", "password".to_string())],
            ))
            .header("apikey", &self.anon_key)
            .json(&json!({ "email": email, "password": password }));

        let response = match send(request).await {
            Ok(response) => response,
            Err(Error::Provider { status: 400, .. }) => return Err(Error::InvalidCredentials),
            Err(e) => return Err(e),
        };
        let token: TokenResponse = read_json(response).await?;
        Ok(Session {
            access_token: token.access_token,
            expires_in: token.expires_in,
            user_id: token.user.id,
        })
    }

    async fn create_user(&self, email: &str, password: &str) -> Result<UserId> {
        let request = self.admin(Method::POST, "/auth/v1/admin/users").json(&json!({
            "email": email,
            "password": password,
            "email_confirm": true,
        }));
        let user: GoTrueUser = read_json(send(request).await?).await?;
        log::info!("Created identity {} for {email}", user.id);
        Ok(user.id)
    }

    async fn delete_user(&self, id: UserId) -> Result<()> {
        let request = self.admin(Method::DELETE, &format!("/auth/v1/admin/users/{id}"));
        send(request)
            .await
            .map(|_| ())
            .map_err(|e| map_missing_user(e, id))
    }

    async fn update_password(&self, id: UserId, password: &str) -> Result<()> {
        let request = self
            .admin(Method::PUT, &format!("/auth/v1/admin/users/{id}"))
            .json(&json!({ "password": password }));
        send(request)
            .await
            .map(|_| ())
            .map_err(|e| map_missing_user(e, id))
    }
}

#[async_trait]
impl ProfileStore for SupabaseBackend {
    async fn find_profile_by_username(&self, username: &str) -> Result<Option<Profile>> {
        self.select_one(
            PROFILES,
            &[("select", "*".into()), ("username", eq(username))],
        )
        .await
    }

    async fn find_profile(&self, id: UserId) -> Result<Option<Profile>> {
        self.select_one(PROFILES, &[("select", "*".into()), ("id", eq(id))])
            .await
    }

    async fn list_profiles(&self) -> Result<Vec<Profile>> {
        self.select(
            PROFILES,
            &[("select", "*".into()), ("order", "username.asc".into())],
        )
        .await
    }

    async fn insert_profile(&self, profile: &Profile) -> Result<()> {
        let request = self
            .rest(Method::POST, PROFILES, &[])
            .header("Prefer", RETURN_MINIMAL)
            .json(&[profile]);
        send(request).await.map(|_| ())
    }

    async fn delete_profile(&self, id: UserId) -> Result<()> {
        let request = self.rest(Method::DELETE, PROFILES, &[("id", eq(id))]);
        send(request).await.map(|_| ())
    }
}

#[async_trait]
impl AuthorizationStore for SupabaseBackend {
    async fn list_authorizations(&self, date: NaiveDate) -> Result<Vec<AuthorizedPerson>> {
        self.select(
            AUTHORIZATIONS,
            &[
                ("select", "*".into()),
                ("date", eq(date)),
                ("order", "created_at.desc".into()),
            ],
        )
        .await
    }

    async fn insert_authorizations(
        &self,
        rows: &[NewAuthorization],
    ) -> Result<Vec<AuthorizedPerson>> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }
        let request = self
            .rest(Method::POST, AUTHORIZATIONS, &[])
            .header("Prefer", RETURN_REPRESENTATION)
            .json(rows);
        read_json(send(request).await?).await
    }

    async fn update_authorization(
        &self,
        id: i64,
        changes: &AuthorizationChanges,
    ) -> Result<AuthorizedPerson> {
        let body = serde_json::to_value(changes).map_err(|e| Error::Decode(e.to_string()))?;
        self.patch_row(AUTHORIZATIONS, "authorization", id, body)
            .await
    }

    async fn delete_authorization(&self, id: i64) -> Result<()> {
        self.delete_row(AUTHORIZATIONS, "authorization", id).await
    }
}

#[async_trait]
impl TicketStore for SupabaseBackend {
    async fn list_tickets(&self, date: NaiveDate) -> Result<Vec<ServiceTicket>> {
        self.select(
            SERVICES,
            &[
                ("select", "*".into()),
                ("date", eq(date)),
                ("order", "created_at.desc".into()),
            ],
        )
        .await
    }

    async fn get_ticket(&self, id: i64) -> Result<Option<ServiceTicket>> {
        self.select_one(SERVICES, &[("select", "*".into()), ("id", eq(id))])
            .await
    }

    async fn insert_ticket(&self, ticket: &NewTicket) -> Result<ServiceTicket> {
        let request = self
            .rest(Method::POST, SERVICES, &[])
            .header("Prefer", RETURN_REPRESENTATION)
            .json(&[ticket]);
        let rows: Vec<ServiceTicket> = read_json(send(request).await?).await?;
        rows.into_iter()
            .next()
            .ok_or_else(|| Error::Decode("insert returned no rows".to_string()))
    }

    async fn update_ticket(&self, id: i64, fields: &TicketFields) -> Result<ServiceTicket> {
        let body = serde_json::to_value(fields).map_err(|e| Error::Decode(e.to_string()))?;
        self.patch_row(SERVICES, "service", id, body).await
    }

    async fn set_ticket_status(&self, id: i64, status: TicketStatus) -> Result<ServiceTicket> {
        self.patch_row(SERVICES, "service", id, json!({ "status": status }))
            .await
    }

    async fn delete_ticket(&self, id: i64) -> Result<()> {
        self.delete_row(SERVICES, "service", id).await
    }
}
