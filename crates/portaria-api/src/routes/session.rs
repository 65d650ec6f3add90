//! Login and the current session.

use axum::Json;
use axum::extract::State;
use serde::{Deserialize, Serialize};

use portaria_backend::{IdentityProvider, ProfileStore};
use portaria_core::{Role, UserId, login_email};

use crate::extract::Payload;
use crate::{AppState, Caller, Error, LoginFailure, Result};

/// Login form.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    /// Username, without the login domain.
    pub username: String,
    /// Password.
    pub password: String,
}

/// Successful login.
#[derive(Debug, Clone, Serialize)]
pub struct LoginResponse {
    /// Bearer token for the other routes.
    pub access_token: String,
    /// Always `bearer`.
    pub token_type: &'static str,
    /// Token lifetime in seconds.
    pub expires_in: u64,
    /// The signed-in username.
    pub username: String,
    /// The signed-in role.
    pub role: Role,
    /// Page the UI should open.
    pub landing: &'static str,
}

/// `POST /api/login`
///
/// The username is looked up first so the UI can tell an unknown user from a
/// wrong password.
pub async fn login(
    State(state): State<AppState>,
    Payload(request): Payload<LoginRequest>,
) -> Result<Json<LoginResponse>> {
    let username = request.username.trim();
    let profile = state
        .backend
        .find_profile_by_username(username)
        .await?
        .ok_or(Error::Login(LoginFailure::UnknownUser))?;

    let email = login_email(username, &state.login_domain);
    let session = match state
        .backend
        .sign_in_with_password(&email, &request.password)
        .await
    {
        Ok(session) => session,
        Err(portaria_backend::Error::InvalidCredentials) => {
            tracing::info!(%username, "login refused");
            return Err(Error::Login(LoginFailure::WrongPassword));
        }
        Err(e) => return Err(e.into()),
    };

    tracing::info!(%username, role = %profile.role, "signed in");
    Ok(Json(LoginResponse {
        access_token: session.access_token,
        token_type: "bearer",
        expires_in: session.expires_in,
        username: profile.username,
        role: profile.role,
        landing: profile.role.landing_path(),
    }))
}

/// The current caller.
#[derive(Debug, Clone, Serialize)]
pub struct MeResponse {
    /// User ID.
    pub id: UserId,
    /// Username.
    pub username: String,
    /// Role.
    pub role: Role,
    /// Role label.
    pub role_label: &'static str,
    /// Page the UI should open.
    pub landing: &'static str,
}

/// `GET /api/me`
pub async fn me(caller: Caller) -> Json<MeResponse> {
    let role = caller.role();
    Json(MeResponse {
        id: caller.profile.id,
        username: caller.profile.username,
        role,
        role_label: role.display_name(),
        landing: role.landing_path(),
    })
}
