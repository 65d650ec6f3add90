//! User administration. Admin only.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use serde::Deserialize;

use portaria_backend::{IdentityProvider, ProfileStore};
use portaria_core::{NewUser, Profile, UserId, login_email, validate_password};

use crate::extract::Payload;
use crate::{AppState, Caller, Error, Result};

fn user_id(raw: &str) -> Result<UserId> {
    raw.parse()
        .map_err(|_| Error::BadRequest(format!("invalid user id '{raw}'")))
}

/// `GET /api/users`: every profile, ordered by username.
pub async fn list(State(state): State<AppState>, caller: Caller) -> Result<Json<Vec<Profile>>> {
    caller.require_user_admin()?;
    Ok(Json(state.backend.list_profiles().await?))
}

/// `POST /api/users`: creates the identity, then its profile.
///
/// If the profile insert fails the fresh identity is removed again, so no
/// account is left without a role.
pub async fn create(
    State(state): State<AppState>,
    caller: Caller,
    Payload(input): Payload<NewUser>,
) -> Result<(StatusCode, Json<Profile>)> {
    caller.require_user_admin()?;
    let username = input.validate()?;

    let email = login_email(&username, &state.login_domain);
    let id = state.backend.create_user(&email, &input.password).await?;

    let profile = Profile {
        id,
        username,
        role: input.role,
    };
    if let Err(e) = state.backend.insert_profile(&profile).await {
        tracing::warn!(user = %profile.username, error = %e, "profile insert failed, removing identity");
        if let Err(cleanup) = state.backend.delete_user(id).await {
            tracing::error!(%id, error = %cleanup, "could not remove orphaned identity");
        }
        return Err(e.into());
    }

    tracing::info!(user = %profile.username, role = %profile.role, by = %caller.profile.username, "user created");
    Ok((StatusCode::CREATED, Json(profile)))
}

/// `DELETE /api/users/{id}`: deletes the identity, then its profile.
///
/// A profile whose identity is already gone is still removed, so a delete
/// that failed halfway can be retried. 404 only when neither exists.
pub async fn remove(
    State(state): State<AppState>,
    caller: Caller,
    Path(raw): Path<String>,
) -> Result<StatusCode> {
    caller.require_user_admin()?;
    let id = user_id(&raw)?;

    match state.backend.delete_user(id).await {
        Ok(()) => {}
        Err(portaria_backend::Error::NotFound { .. }) => {
            if state.backend.find_profile(id).await?.is_none() {
                return Err(Error::not_found("user", id));
            }
            tracing::warn!(%id, "identity already gone, removing leftover profile");
        }
        Err(e) => return Err(e.into()),
    }
    state.backend.delete_profile(id).await?;

    tracing::info!(%id, by = %caller.profile.username, "user deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// Body of the password reset.
#[derive(Debug, Clone, Deserialize)]
pub struct PasswordReset {
    /// New password.
    pub password: String,
}

/// `PUT /api/users/{id}/password`
pub async fn reset_password(
    State(state): State<AppState>,
    caller: Caller,
    Path(raw): Path<String>,
    Payload(reset): Payload<PasswordReset>,
) -> Result<StatusCode> {
    caller.require_user_admin()?;
    let id = user_id(&raw)?;
    validate_password(&reset.password)?;

    state.backend.update_password(id, &reset.password).await?;

    tracing::info!(%id, by = %caller.profile.username, "password reset");
    Ok(StatusCode::NO_CONTENT)
}
