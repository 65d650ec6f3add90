//! Supabase access-token validation for Portaria.
//!
//! Implements [`portaria_auth::TokenValidator`] for a Supabase project:
//! - HS256 access tokens verified locally with the project JWT secret
//! - Without a secret, tokens are checked against the project's `/auth/v1/user` endpoint
//!
//! [`issue_access_token`] signs tokens in the same format, for backends that
//! hand out their own sessions.

use std::future::Future;
use std::pin::Pin;
use std::time::{SystemTime, UNIX_EPOCH};

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use portaria_auth::{AuthConfig, AuthError, AuthenticatedUser, TokenValidator};

/// Claims carried by a Supabase access token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessClaims {
    /// User ID.
    pub sub: String,
    /// Login e-mail.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Audience, `authenticated` for signed-in users.
    pub aud: String,
    /// Postgres role the token maps to.
    #[serde(default)]
    pub role: String,
    /// Expiry (seconds since the epoch).
    pub exp: u64,
    /// Issued at (seconds since the epoch).
    #[serde(default)]
    pub iat: u64,
}

impl AccessClaims {
    /// Claims for a signed-in user, valid for `ttl_secs` from now.
    pub fn for_user(subject: &str, email: &str, audience: &str, ttl_secs: u64) -> Self {
        let now = now_epoch();
        Self {
            sub: subject.to_string(),
            email: Some(email.to_string()),
            aud: audience.to_string(),
            role: "authenticated".to_string(),
            exp: now + ttl_secs,
            iat: now,
        }
    }
}

/// Signs `claims` as an HS256 access token.
pub fn issue_access_token(claims: &AccessClaims, secret: &str) -> Result<String, AuthError> {
    encode(
        &Header::new(Algorithm::HS256),
        claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AuthError::InvalidFormat(e.to_string()))
}

fn now_epoch() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}

/// Response from the project's `/auth/v1/user` endpoint.
#[derive(Debug, Deserialize)]
struct UserResponse {
    id: String,
    email: Option<String>,
}

/// Supabase token validator.
pub struct SupabaseTokenValidator {
    jwt_secret: Option<String>,
    project_url: String,
    anon_key: String,
    http_client: Option<reqwest::Client>,
}

impl SupabaseTokenValidator {
    /// Validator that checks tokens locally with the project JWT secret.
    pub fn with_secret(secret: impl Into<String>) -> Self {
        Self {
            jwt_secret: Some(secret.into()),
            project_url: String::new(),
            anon_key: String::new(),
            http_client: None,
        }
    }

    /// Validator that asks the project's user endpoint about every token.
    pub fn remote(project_url: impl Into<String>, anon_key: impl Into<String>) -> Self {
        Self {
            jwt_secret: None,
            project_url: project_url.into().trim_end_matches('/').to_string(),
            anon_key: anon_key.into(),
            http_client: Some(reqwest::Client::new()),
        }
    }

    async fn validate_token(
        &self,
        token: &str,
        audience: &str,
        domain: &str,
    ) -> Result<AuthenticatedUser, AuthError> {
        let user = match &self.jwt_secret {
            Some(secret) => Self::validate_jwt(token, secret, audience)?,
            None => self.validate_remote(token).await?,
        };
        Self::check_domain(&user.email, domain)?;
        Ok(user)
    }

    fn validate_jwt(
        token: &str,
        secret: &str,
        audience: &str,
    ) -> Result<AuthenticatedUser, AuthError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_audience(&[audience]);

        let token_data = decode::<AccessClaims>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &validation,
        )
        .map_err(|e| match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::Expired,
            jsonwebtoken::errors::ErrorKind::InvalidAudience => AuthError::InvalidAudience,
            jsonwebtoken::errors::ErrorKind::InvalidToken => AuthError::InvalidFormat(e.to_string()),
            _ => AuthError::InvalidSignature(e.to_string()),
        })?;

        let claims = token_data.claims;
        let email = claims.email.ok_or(AuthError::MissingEmail)?;
        Ok(AuthenticatedUser {
            email,
            subject: claims.sub,
        })
    }

    async fn validate_remote(&self, token: &str) -> Result<AuthenticatedUser, AuthError> {
        let client = self.http_client.as_ref().ok_or_else(|| {
            AuthError::InvalidFormat("no HTTP client for remote token validation".to_string())
        })?;

        let response = client
            .get(format!("{}/auth/v1/user", self.project_url))
            .header("apikey", &self.anon_key)
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| AuthError::ProviderUnavailable(format!("user request failed: {e}")))?;

        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN
        {
            return Err(AuthError::InvalidSignature(format!(
                "provider rejected token (HTTP {status})"
            )));
        }
        if !status.is_success() {
            return Err(AuthError::ProviderUnavailable(format!(
                "user endpoint returned HTTP {status}"
            )));
        }

        let user: UserResponse = response.json().await.map_err(|e| {
            AuthError::ProviderUnavailable(format!("user response parse failed: {e}"))
        })?;
        let email = user.email.ok_or(AuthError::MissingEmail)?;

        log::debug!("Access token validated remotely for {email}");

        Ok(AuthenticatedUser {
            email,
            subject: user.id,
        })
    }

    /// Verify that the e-mail belongs to the configured login domain.
    fn check_domain(email: &str, domain: &str) -> Result<(), AuthError> {
        if domain.is_empty() {
            return Ok(());
        }

        let user_domain = email.rsplit_once('@').map(|(_, d)| d).unwrap_or("");
        if !user_domain.eq_ignore_ascii_case(domain) {
            return Err(AuthError::InvalidDomain {
                domain: user_domain.to_string(),
                expected: domain.to_string(),
            });
        }

        Ok(())
    }
}

impl TokenValidator for SupabaseTokenValidator {
    fn validate(
        &self,
        token: &str,
        config: &AuthConfig,
    ) -> Pin<Box<dyn Future<Output = Result<AuthenticatedUser, AuthError>> + Send + '_>> {
        let token = token.to_string();
        let audience = config.audience.clone();
        let domain = config.domain.clone();
        Box::pin(async move { self.validate_token(&token, &audience, &domain).await })
    }
}
