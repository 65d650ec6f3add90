//! Room-access authorizations for a day.
//!
//! Every signed-in role may read and write.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use serde::{Deserialize, Serialize};

use portaria_backend::AuthorizationStore;
use portaria_core::bulk::{RejectedLine, parse_authorizations};
use portaria_core::{AuthorizationInput, AuthorizedPerson, filter};

use super::{DayList, DayQuery, resolve_day, row_id};
use crate::extract::Payload;
use crate::{AppState, Caller, Result};

/// `GET /api/authorizations?date=&q=`
pub async fn list(
    State(state): State<AppState>,
    _caller: Caller,
    Query(query): Query<DayQuery>,
) -> Result<Json<DayList<AuthorizedPerson>>> {
    let date = query.day(state.clock.today())?;
    let rows = state.backend.list_authorizations(date).await?;
    Ok(Json(DayList::new(date, filter::apply(rows, &query.term()))))
}

/// Body of a single authorization.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateAuthorization {
    /// Day the person is authorized for; defaults to today.
    #[serde(default)]
    pub date: Option<String>,
    /// Person and rooms.
    #[serde(flatten)]
    pub person: AuthorizationInput,
}

/// `POST /api/authorizations`
pub async fn create(
    State(state): State<AppState>,
    caller: Caller,
    Payload(body): Payload<CreateAuthorization>,
) -> Result<(StatusCode, Json<AuthorizedPerson>)> {
    let date = resolve_day(body.date.as_deref(), state.clock.today())?;
    let row = body.person.validate(date)?;

    let mut inserted = state.backend.insert_authorizations(&[row]).await?;
    let person = inserted.pop().ok_or_else(|| {
        portaria_backend::Error::Decode("insert returned no rows".to_string())
    })?;

    tracing::info!(id = person.id, %date, by = %caller.profile.username, "authorization added");
    Ok((StatusCode::CREATED, Json(person)))
}

/// Body of a bulk import.
#[derive(Debug, Clone, Deserialize)]
pub struct BulkRequest {
    /// Day every imported person is authorized for; defaults to today.
    #[serde(default)]
    pub date: Option<String>,
    /// One `name;cpf;room1,room2` line per person.
    pub text: String,
}

/// Outcome of a bulk import.
#[derive(Debug, Clone, Serialize)]
pub struct BulkResponse {
    /// Rows written.
    pub inserted: usize,
    /// Lines that were skipped.
    pub rejected: Vec<RejectedLine>,
}

/// `POST /api/authorizations/bulk`
///
/// Valid lines are written in one call; nothing is written when no line is
/// valid.
pub async fn bulk(
    State(state): State<AppState>,
    caller: Caller,
    Payload(body): Payload<BulkRequest>,
) -> Result<Json<BulkResponse>> {
    let date = resolve_day(body.date.as_deref(), state.clock.today())?;
    let parsed = parse_authorizations(&body.text, date);

    let inserted = if parsed.accepted.is_empty() {
        0
    } else {
        state
            .backend
            .insert_authorizations(&parsed.accepted)
            .await?
            .len()
    };

    tracing::info!(
        inserted,
        rejected = parsed.rejected.len(),
        %date,
        by = %caller.profile.username,
        "bulk authorization import"
    );
    Ok(Json(BulkResponse {
        inserted,
        rejected: parsed.rejected,
    }))
}

/// `PUT /api/authorizations/{id}`: replaces name, CPF, and rooms.
pub async fn update(
    State(state): State<AppState>,
    caller: Caller,
    Path(raw): Path<String>,
    Payload(input): Payload<AuthorizationInput>,
) -> Result<Json<AuthorizedPerson>> {
    let id = row_id(&raw)?;
    let changes = input.validate_changes()?;
    let person = state.backend.update_authorization(id, &changes).await?;
    tracing::info!(id, by = %caller.profile.username, "authorization updated");
    Ok(Json(person))
}

/// `DELETE /api/authorizations/{id}`
pub async fn remove(
    State(state): State<AppState>,
    caller: Caller,
    Path(raw): Path<String>,
) -> Result<StatusCode> {
    let id = row_id(&raw)?;
    state.backend.delete_authorization(id).await?;
    tracing::info!(id, by = %caller.profile.username, "authorization removed");
    Ok(StatusCode::NO_CONTENT)
}
