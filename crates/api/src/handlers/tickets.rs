//! Handlers for the `/tickets` resource.
//!
//! Every mutation follows the same shape: load the stored ticket, hand it to
//! the pure lifecycle functions in `helpdesk_core::lifecycle`, and persist
//! only when they return `Ok`. A rejected transition never reaches the
//! store.

use std::str::FromStr;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use chrono::{NaiveDate, SubsecRound, Utc};
use helpdesk_core::error::CoreError;
use helpdesk_core::lifecycle::{self, LifecycleError, TicketDraft, TicketEdit};
use helpdesk_core::search::{
    clamp_limit, clamp_offset, day_bounds, DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT,
};
use helpdesk_core::ticket::{Ticket, TicketStatus, UnknownVariant};
use helpdesk_core::types::{DbId, Timestamp};
use helpdesk_db::models::ticket::{SaveOutcome, TicketFilters};
use helpdesk_db::repositories::{CustomerRepo, TicketRepo, UserRepo};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::{RequireAdmin, RequireAuth, RequireSupport};
use crate::query::non_empty_filter;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Query parameters for `GET /tickets`.
///
/// Enum filters arrive as raw text so an unknown status can be reported as
/// `INVALID_STATUS` instead of a generic deserialization failure.
#[derive(Debug, Default, Deserialize)]
pub struct TicketListParams {
    pub q: Option<String>,
    pub status: Option<String>,
    pub priority: Option<String>,
    pub category: Option<String>,
    pub assigned_to: Option<DbId>,
    pub created_by: Option<String>,
    pub customer_id: Option<DbId>,
    /// Inclusive, calendar day in UTC.
    pub date_from: Option<NaiveDate>,
    /// Inclusive, calendar day in UTC.
    pub date_to: Option<NaiveDate>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Request body for `PATCH /tickets/{id}/status`.
#[derive(Debug, Deserialize)]
pub struct StatusUpdateRequest {
    #[serde(default)]
    pub status: String,
    pub notes: Option<String>,
}

/// Request body for `PATCH /tickets/{id}/assign`. `null` or absent unassigns.
#[derive(Debug, Deserialize)]
pub struct AssignRequest {
    #[serde(default)]
    pub assigned_to: Option<DbId>,
}

/// Request body for `POST /tickets/bulk-delete`.
#[derive(Debug, Deserialize)]
pub struct BulkDeleteRequest {
    pub ids: Vec<DbId>,
}

#[derive(Debug, Serialize)]
pub struct BulkDeleteResponse {
    pub deleted: u64,
}

// ---------------------------------------------------------------------------
// GET /tickets
// ---------------------------------------------------------------------------

/// List tickets with optional filters, newest first.
pub async fn list_tickets(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
    Query(params): Query<TicketListParams>,
) -> AppResult<impl IntoResponse> {
    let filters = ticket_filters(&params)?;
    let limit = clamp_limit(params.limit, DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT);
    let offset = clamp_offset(params.offset);

    let tickets = TicketRepo::list_filtered(&state.pool, &filters, limit, offset).await?;
    Ok(Json(DataResponse { data: tickets }))
}

// ---------------------------------------------------------------------------
// POST /tickets
// ---------------------------------------------------------------------------

/// Open a new ticket. The creator is recorded as the first history actor.
pub async fn create_ticket(
    RequireSupport(user): RequireSupport,
    State(state): State<AppState>,
    Json(draft): Json<TicketDraft>,
) -> AppResult<impl IntoResponse> {
    let mut new_ticket = lifecycle::create_ticket(&draft, &user.actor(), now())?;

    let customer = CustomerRepo::find_by_id(&state.pool, new_ticket.customer_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Customer",
            id: new_ticket.customer_id,
        }))?;
    if new_ticket.customer_name.trim().is_empty() {
        new_ticket.customer_name = customer.name;
    }
    ensure_assignee_exists(&state.pool, new_ticket.assigned_to).await?;

    let ticket = TicketRepo::create(&state.pool, &new_ticket).await?;

    tracing::info!(
        ticket_id = ticket.id,
        customer_id = ticket.customer_id,
        user_id = user.user_id,
        "Ticket created",
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: ticket })))
}

// ---------------------------------------------------------------------------
// GET /tickets/{id}
// ---------------------------------------------------------------------------

pub async fn get_ticket(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let ticket = load_ticket(&state.pool, id).await?;
    Ok(Json(DataResponse { data: ticket }))
}

// ---------------------------------------------------------------------------
// PUT /tickets/{id}
// ---------------------------------------------------------------------------

/// Edit ticket fields. A `status` in the body goes through the same
/// transition rules as `PATCH /tickets/{id}/status`.
pub async fn update_ticket(
    RequireSupport(user): RequireSupport,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(mut edit): Json<TicketEdit>,
) -> AppResult<impl IntoResponse> {
    let current = load_ticket(&state.pool, id).await?;

    if let Some(customer_id) = edit.customer_id {
        let customer = CustomerRepo::find_by_id(&state.pool, customer_id)
            .await?
            .ok_or(AppError::Core(CoreError::NotFound {
                entity: "Customer",
                id: customer_id,
            }))?;
        if edit.customer_name.is_none() {
            edit.customer_name = Some(customer.name);
        }
    }
    if let Some(assignee) = edit.assigned_to {
        ensure_assignee_exists(&state.pool, assignee).await?;
    }

    let next = lifecycle::apply_edit(&current, &edit, &user.actor(), now())?;
    let saved = persist(&state.pool, &next, current.status_history.len()).await?;

    if saved.status != current.status {
        log_status_change(&current, &saved, user.user_id);
    }
    tracing::info!(ticket_id = id, user_id = user.user_id, "Ticket updated");

    Ok(Json(DataResponse { data: saved }))
}

// ---------------------------------------------------------------------------
// DELETE /tickets/{id}
// ---------------------------------------------------------------------------

/// Delete a ticket together with its status history.
pub async fn delete_ticket(
    RequireSupport(user): RequireSupport,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if !TicketRepo::delete(&state.pool, id).await? {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Ticket",
            id,
        }));
    }
    tracing::info!(ticket_id = id, user_id = user.user_id, "Ticket deleted");
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// POST /tickets/bulk-delete
// ---------------------------------------------------------------------------

/// Delete several tickets. Unknown ids are skipped; the count of removed
/// tickets is returned.
pub async fn bulk_delete_tickets(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<BulkDeleteRequest>,
) -> AppResult<impl IntoResponse> {
    if input.ids.is_empty() {
        return Err(AppError::BadRequest("ids must not be empty".into()));
    }

    let deleted = TicketRepo::delete_many(&state.pool, &input.ids).await?;
    tracing::info!(
        requested = input.ids.len(),
        deleted,
        user_id = admin.user_id,
        "Tickets bulk deleted",
    );

    Ok(Json(DataResponse {
        data: BulkDeleteResponse { deleted },
    }))
}

// ---------------------------------------------------------------------------
// PATCH /tickets/{id}/status
// ---------------------------------------------------------------------------

/// Move a ticket to a new status and append a history entry.
pub async fn update_status(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<StatusUpdateRequest>,
) -> AppResult<impl IntoResponse> {
    let current = load_ticket(&state.pool, id).await?;

    let next = lifecycle::apply_transition(
        &current,
        &input.status,
        &user.actor(),
        input.notes.as_deref(),
        now(),
    )?;
    let saved = persist(&state.pool, &next, current.status_history.len()).await?;

    log_status_change(&current, &saved, user.user_id);
    Ok(Json(DataResponse { data: saved }))
}

// ---------------------------------------------------------------------------
// PATCH /tickets/{id}/assign
// ---------------------------------------------------------------------------

pub async fn assign_ticket(
    RequireSupport(user): RequireSupport,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<AssignRequest>,
) -> AppResult<impl IntoResponse> {
    let current = load_ticket(&state.pool, id).await?;
    ensure_assignee_exists(&state.pool, input.assigned_to).await?;

    let next = lifecycle::assign(&current, input.assigned_to, now());
    let saved = persist(&state.pool, &next, current.status_history.len()).await?;

    tracing::info!(
        ticket_id = id,
        assigned_to = ?saved.assigned_to,
        user_id = user.user_id,
        "Ticket assigned",
    );
    Ok(Json(DataResponse { data: saved }))
}

// ---------------------------------------------------------------------------
// GET /tickets/{id}/history
// ---------------------------------------------------------------------------

/// The ticket's status history, oldest first.
pub async fn ticket_history(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let history = TicketRepo::history(&state.pool, id).await?;
    // Every stored ticket has at least its creation entry.
    if history.is_empty() {
        load_ticket(&state.pool, id).await?;
    }
    Ok(Json(DataResponse { data: history }))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Clock reading truncated to the store's microsecond precision, so a
/// returned ticket compares equal to the same ticket loaded back.
fn now() -> Timestamp {
    Utc::now().trunc_subsecs(6)
}

async fn load_ticket(pool: &PgPool, id: DbId) -> AppResult<Ticket> {
    TicketRepo::find_by_id(pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Ticket",
            id,
        }))
}

/// Save and map a vanished row to 404.
async fn persist(pool: &PgPool, ticket: &Ticket, persisted_len: usize) -> AppResult<Ticket> {
    match TicketRepo::save(pool, ticket, persisted_len).await? {
        SaveOutcome::Saved(saved) => Ok(saved),
        SaveOutcome::NotFound => Err(AppError::Core(CoreError::NotFound {
            entity: "Ticket",
            id: ticket.id,
        })),
        SaveOutcome::Stale => Err(AppError::Core(CoreError::Conflict(
            "Ticket was changed by another request; reload and try again".into(),
        ))),
    }
}

async fn ensure_assignee_exists(pool: &PgPool, assignee: Option<DbId>) -> AppResult<()> {
    if let Some(user_id) = assignee {
        if UserRepo::find_by_id(pool, user_id).await?.is_none() {
            return Err(AppError::Core(CoreError::NotFound {
                entity: "User",
                id: user_id,
            }));
        }
    }
    Ok(())
}

fn log_status_change(before: &Ticket, after: &Ticket, user_id: DbId) {
    tracing::info!(
        ticket_id = after.id,
        from = %before.status,
        to = %after.status,
        user_id,
        "Ticket status updated",
    );
}

/// Parse an optional enum filter; blank and `all` mean no filter.
fn parse_filter<T>(raw: Option<&str>) -> Result<Option<T>, UnknownVariant>
where
    T: FromStr<Err = UnknownVariant>,
{
    non_empty_filter(raw).map(|s| s.parse::<T>()).transpose()
}

fn ticket_filters(params: &TicketListParams) -> AppResult<TicketFilters> {
    let status = parse_filter::<TicketStatus>(params.status.as_deref())
        .map_err(|e| LifecycleError::InvalidStatus(e.value))?;
    let priority = parse_filter(params.priority.as_deref())
        .map_err(|e| CoreError::Validation(e.to_string()))?;
    let category = parse_filter(params.category.as_deref())
        .map_err(|e| CoreError::Validation(e.to_string()))?;
    let (created_from, created_before) = day_bounds(params.date_from, params.date_to);

    Ok(TicketFilters {
        search: params.q.clone(),
        status,
        priority,
        category,
        assigned_to: params.assigned_to,
        created_by: non_empty_filter(params.created_by.as_deref()).map(str::to_string),
        customer_id: params.customer_id,
        created_from,
        created_before,
    })
}
