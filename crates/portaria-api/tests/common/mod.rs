//! Common test utilities and harness for the API integration tests.

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use chrono::NaiveDate;
use serde_json::Value;
use tower::ServiceExt;

use portaria_api::{AppState, router};
use portaria_auth::AuthConfig;
use portaria_auth_supabase::SupabaseTokenValidator;
use portaria_backend::{IdentityProvider, MemoryBackend, ProfileStore};
use portaria_core::{FixedClock, Profile, Role, UserId, login_email};

/// JWT secret shared by the memory backend and the validator.
pub const SECRET: &str = "integration-test-secret";

/// Login domain.
pub const DOMAIN: &str = "fake.local";

/// Default password of seeded users.
pub const PASSWORD: &str = "secret1";

/// The pinned "today".
pub fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 18).unwrap()
}

/// Test harness: the router plus direct access to its backend.
pub struct TestApp {
    /// The full console router.
    pub router: Router,
    /// The backend behind it.
    pub backend: Arc<MemoryBackend>,
}

impl TestApp {
    /// Creates an app with authentication enabled and no users.
    pub fn new() -> Self {
        let clock = Arc::new(FixedClock::on(today()));
        let backend = Arc::new(MemoryBackend::new(clock.clone(), SECRET, "authenticated"));
        let state = AppState::new(backend.clone(), clock, DOMAIN);
        let auth = AuthConfig {
            enabled: true,
            audience: "authenticated".to_string(),
            domain: DOMAIN.to_string(),
        };
        let validator = Arc::new(SupabaseTokenValidator::with_secret(SECRET));
        Self {
            router: router(state, validator, auth),
            backend,
        }
    }

    /// Creates an app with authentication disabled.
    pub fn without_auth() -> Self {
        let clock = Arc::new(FixedClock::on(today()));
        let backend = Arc::new(MemoryBackend::new(clock.clone(), SECRET, "authenticated"));
        let state = AppState::new(backend.clone(), clock, DOMAIN).with_auth_enabled(false);
        let auth = AuthConfig {
            enabled: false,
            ..Default::default()
        };
        let validator = Arc::new(SupabaseTokenValidator::with_secret(SECRET));
        Self {
            router: router(state, validator, auth),
            backend,
        }
    }

    /// Seeds an identity and its profile directly in the backend.
    pub async fn add_user(&self, username: &str, role: Role) -> UserId {
        let id = self
            .backend
            .create_user(&login_email(username, DOMAIN), PASSWORD)
            .await
            .unwrap();
        self.backend
            .insert_profile(&Profile {
                id,
                username: username.to_string(),
                role,
            })
            .await
            .unwrap();
        id
    }

    /// Seeds a user and signs them in through the API.
    pub async fn signed_in(&self, username: &str, role: Role) -> String {
        self.add_user(username, role).await;
        self.login(username, PASSWORD).await
    }

    /// Signs in through the API and returns the access token.
    pub async fn login(&self, username: &str, password: &str) -> String {
        let (status, body) = self
            .call(
                Method::POST,
                "/api/login",
                None,
                Some(serde_json::json!({ "username": username, "password": password })),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "login failed: {body}");
        body["access_token"].as_str().unwrap().to_string()
    }

    /// Sends one request and returns the status and JSON body (`Null` when empty).
    pub async fn call(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header("authorization", format!("Bearer {token}"));
        }
        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    /// GET with a token.
    pub async fn get(&self, uri: &str, token: &str) -> (StatusCode, Value) {
        self.call(Method::GET, uri, Some(token), None).await
    }

    /// POST JSON with a token.
    pub async fn post(&self, uri: &str, token: &str, body: Value) -> (StatusCode, Value) {
        self.call(Method::POST, uri, Some(token), Some(body)).await
    }

    /// PUT JSON with a token.
    pub async fn put(&self, uri: &str, token: &str, body: Value) -> (StatusCode, Value) {
        self.call(Method::PUT, uri, Some(token), Some(body)).await
    }

    /// DELETE with a token.
    pub async fn delete(&self, uri: &str, token: &str) -> (StatusCode, Value) {
        self.call(Method::DELETE, uri, Some(token), None).await
    }
}

impl Default for TestApp {
    fn default() -> Self {
        Self::new()
    }
}
