//! Handlers for the `/customers` resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use helpdesk_core::customer;
use helpdesk_core::error::CoreError;
use helpdesk_core::search::{clamp_limit, clamp_offset, DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT};
use helpdesk_core::types::DbId;
use helpdesk_db::models::customer::{CreateCustomer, CustomerFilters, UpdateCustomer};
use helpdesk_db::models::ticket::TicketFilters;
use helpdesk_db::repositories::{CustomerRepo, TicketRepo};
use serde::Deserialize;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::{RequireAuth, RequireSupport};
use crate::query::{non_empty_filter, PaginationParams};
use crate::response::DataResponse;
use crate::state::AppState;

/// Query parameters for `GET /customers`.
#[derive(Debug, Deserialize)]
pub struct CustomerListParams {
    pub q: Option<String>,
    /// A customer status, or `all`.
    pub status: Option<String>,
    pub service_type: Option<String>,
    pub city: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

// ---------------------------------------------------------------------------
// GET /customers
// ---------------------------------------------------------------------------

pub async fn list_customers(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
    Query(params): Query<CustomerListParams>,
) -> AppResult<impl IntoResponse> {
    let status = customer::status_filter(params.status.as_deref())?;
    let filters = CustomerFilters {
        search: params.q.clone(),
        status: status.map(str::to_string),
        service_type: non_empty_filter(params.service_type.as_deref()).map(str::to_string),
        city: non_empty_filter(params.city.as_deref()).map(str::to_string),
    };
    let limit = clamp_limit(params.limit, DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT);
    let offset = clamp_offset(params.offset);

    let customers = CustomerRepo::list_filtered(&state.pool, &filters, limit, offset).await?;
    Ok(Json(DataResponse { data: customers }))
}

// ---------------------------------------------------------------------------
// POST /customers
// ---------------------------------------------------------------------------

pub async fn create_customer(
    RequireSupport(user): RequireSupport,
    State(state): State<AppState>,
    Json(input): Json<CreateCustomer>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;
    if let Some(ref status) = input.status {
        customer::validate_status(status)?;
    }

    let created = CustomerRepo::create(&state.pool, &input).await?;
    tracing::info!(
        customer_id = created.id,
        user_id = user.user_id,
        "Customer created",
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: created })))
}

// ---------------------------------------------------------------------------
// GET /customers/{id}
// ---------------------------------------------------------------------------

pub async fn get_customer(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let found = CustomerRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Customer",
            id,
        }))?;
    Ok(Json(DataResponse { data: found }))
}

// ---------------------------------------------------------------------------
// PUT /customers/{id}
// ---------------------------------------------------------------------------

/// Update a customer. Existing tickets keep the customer name they were
/// opened with.
pub async fn update_customer(
    RequireSupport(user): RequireSupport,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateCustomer>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;
    if let Some(ref status) = input.status {
        customer::validate_status(status)?;
    }

    let updated = CustomerRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Customer",
            id,
        }))?;
    tracing::info!(customer_id = id, user_id = user.user_id, "Customer updated");

    Ok(Json(DataResponse { data: updated }))
}

// ---------------------------------------------------------------------------
// DELETE /customers/{id}
// ---------------------------------------------------------------------------

/// Delete a customer. Refused with 409 while tickets still reference it.
pub async fn delete_customer(
    RequireSupport(user): RequireSupport,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if !CustomerRepo::delete(&state.pool, id).await? {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Customer",
            id,
        }));
    }
    tracing::info!(customer_id = id, user_id = user.user_id, "Customer deleted");
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// GET /customers/{id}/tickets
// ---------------------------------------------------------------------------

/// Tickets opened for one customer, newest first.
pub async fn customer_tickets(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Query(page): Query<PaginationParams>,
) -> AppResult<impl IntoResponse> {
    if CustomerRepo::find_by_id(&state.pool, id).await?.is_none() {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Customer",
            id,
        }));
    }

    let filters = TicketFilters {
        customer_id: Some(id),
        ..Default::default()
    };
    let (limit, offset) = page.clamped();
    let tickets = TicketRepo::list_filtered(&state.pool, &filters, limit, offset).await?;

    Ok(Json(DataResponse { data: tickets }))
}
