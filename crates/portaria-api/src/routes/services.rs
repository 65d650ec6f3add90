//! Service tickets for a day.
//!
//! Statuses are derived against today on every read. Every role sees every
//! ticket; only admins create, edit, or delete them.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;

use portaria_backend::TicketStore;
use portaria_core::{NewTicket, ServiceTicket, TicketInput, TicketStatus, filter};

use super::{DayList, DayQuery, row_id};
use crate::extract::Payload;
use crate::{AppState, Caller, Error, Result};

/// `GET /api/services?date=&q=`
pub async fn list(
    State(state): State<AppState>,
    caller: Caller,
    Query(query): Query<DayQuery>,
) -> Result<Json<DayList<ServiceTicket>>> {
    let today = state.clock.today();
    let date = query.day(today)?;
    tracing::debug!(%date, by = %caller.profile.username, "listing services");

    let tickets: Vec<ServiceTicket> = state
        .backend
        .list_tickets(date)
        .await?
        .into_iter()
        .map(|t| t.with_derived_status(today))
        .collect();

    Ok(Json(DayList::new(date, filter::apply(tickets, &query.term()))))
}

/// `POST /api/services`
pub async fn create(
    State(state): State<AppState>,
    caller: Caller,
    Payload(input): Payload<TicketInput>,
) -> Result<(StatusCode, Json<ServiceTicket>)> {
    caller.require_ticket_admin()?;
    let today = state.clock.today();
    let ticket = NewTicket::from(input.validate(today)?);

    let created = state.backend.insert_ticket(&ticket).await?;
    tracing::info!(id = created.id, service = %created.service, date = %created.date, "service created");
    Ok((StatusCode::CREATED, Json(created.with_derived_status(today))))
}

/// `PUT /api/services/{id}`: replaces the editable fields; status is kept.
///
/// Without a `date` the ticket stays on its scheduled day.
pub async fn update(
    State(state): State<AppState>,
    caller: Caller,
    Path(raw): Path<String>,
    Payload(input): Payload<TicketInput>,
) -> Result<Json<ServiceTicket>> {
    caller.require_ticket_admin()?;
    let id = row_id(&raw)?;
    let today = state.clock.today();
    let scheduled = match input.date {
        Some(date) => date,
        None => {
            state
                .backend
                .get_ticket(id)
                .await?
                .ok_or_else(|| Error::not_found("service", id))?
                .date
        }
    };
    let fields = input.validate(scheduled)?;

    let updated = state.backend.update_ticket(id, &fields).await?;
    Ok(Json(updated.with_derived_status(today)))
}

/// `POST /api/services/{id}/complete`
///
/// Any role may complete a ticket. Completing a completed ticket is a no-op.
pub async fn complete(
    State(state): State<AppState>,
    caller: Caller,
    Path(raw): Path<String>,
) -> Result<Json<ServiceTicket>> {
    let id = row_id(&raw)?;
    let ticket = state
        .backend
        .get_ticket(id)
        .await?
        .ok_or_else(|| Error::not_found("service", id))?;

    let updated = if ticket.status.is_completed() {
        ticket
    } else {
        state
            .backend
            .set_ticket_status(id, TicketStatus::Completed)
            .await?
    };

    tracing::info!(id, by = %caller.profile.username, "service completed");
    Ok(Json(updated))
}

/// `DELETE /api/services/{id}`
pub async fn remove(
    State(state): State<AppState>,
    caller: Caller,
    Path(raw): Path<String>,
) -> Result<StatusCode> {
    caller.require_ticket_admin()?;
    let id = row_id(&raw)?;
    state.backend.delete_ticket(id).await?;
    tracing::info!(id, by = %caller.profile.username, "service deleted");
    Ok(StatusCode::NO_CONTENT)
}
