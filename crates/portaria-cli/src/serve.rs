//! Wiring for `portaria serve`: backend, clock, validator, and server.

use std::sync::Arc;

use anyhow::{Context, Result};
use uuid::Uuid;

use portaria_api::{AppState, Server};
use portaria_auth::AuthConfig;
use portaria_auth_supabase::SupabaseTokenValidator;
use portaria_backend::{
    Backend, IdentityProvider, MemoryBackend, ProfileStore, SupabaseBackend,
};
use portaria_core::config::{BackendKind, SeedConfig};
use portaria_core::{Clock, NewUser, PortariaConfig, Profile, Role, SystemClock, login_email};

/// Builds the API server described by `config`.
pub async fn build_server(config: &PortariaConfig) -> Result<Server> {
    let clock: Arc<dyn Clock> = Arc::new(SystemClock::from_name(&config.clock.timezone)?);

    let (backend, validator): (Arc<dyn Backend>, SupabaseTokenValidator) = match config.backend.kind
    {
        BackendKind::Memory => {
            let secret = match &config.auth.jwt_secret {
                Some(secret) => secret.clone(),
                None => {
                    tracing::info!("No JWT secret configured; using a per-process secret");
                    ephemeral_secret()
                }
            };
            let backend = MemoryBackend::new(clock.clone(), secret.clone(), &config.auth.audience);
            match seed_admin(&backend, &config.seed, &config.auth.login_domain).await? {
                Some(profile) => tracing::info!(user = %profile.username, "seeded admin account"),
                None => tracing::warn!(
                    "memory backend has no accounts; set seed.admin_username and seed.admin_password"
                ),
            }
            tracing::warn!("Using the in-memory backend; data is lost on restart");
            (
                Arc::new(backend),
                SupabaseTokenValidator::with_secret(secret),
            )
        }
        BackendKind::Supabase => {
            let backend = SupabaseBackend::from_config(&config.backend)
                .context("failed to configure the supabase backend")?;
            let validator = match (&config.auth.jwt_secret, &config.backend.url, &config.backend.anon_key) {
                (Some(secret), _, _) => SupabaseTokenValidator::with_secret(secret.clone()),
                (None, Some(url), Some(anon_key)) => {
                    tracing::info!("No JWT secret configured; validating tokens remotely");
                    SupabaseTokenValidator::remote(url.clone(), anon_key.clone())
                }
                _ => anyhow::bail!("supabase backend requires backend.url and backend.anon_key"),
            };
            (Arc::new(backend), validator)
        }
    };

    if !config.auth.enabled {
        tracing::warn!("Authentication is DISABLED; every request acts as an administrator");
    }

    let state = AppState::new(backend, clock, config.auth.login_domain.clone())
        .with_auth_enabled(config.auth.enabled);
    let auth = AuthConfig {
        enabled: config.auth.enabled,
        audience: config.auth.audience.clone(),
        domain: config.auth.login_domain.clone(),
    };
    Ok(Server::new(state, Arc::new(validator), auth))
}

/// Creates the bootstrap administrator unless it already exists.
///
/// Returns the profile when one was created.
pub async fn seed_admin(
    backend: &dyn Backend,
    seed: &SeedConfig,
    login_domain: &str,
) -> Result<Option<Profile>> {
    let (Some(username), Some(password)) = (&seed.admin_username, &seed.admin_password) else {
        return Ok(None);
    };
    let user = NewUser {
        username: username.clone(),
        password: password.clone(),
        role: Role::Admin,
    };
    let username = user.validate().context("invalid seed account")?;

    if backend.find_profile_by_username(&username).await?.is_some() {
        return Ok(None);
    }

    let id = backend
        .create_user(&login_email(&username, login_domain), &user.password)
        .await?;
    let profile = Profile {
        id,
        username,
        role: Role::Admin,
    };
    backend.insert_profile(&profile).await?;
    Ok(Some(profile))
}

fn ephemeral_secret() -> String {
    format!("{}{}", Uuid::new_v4().simple(), Uuid::new_v4().simple())
}
