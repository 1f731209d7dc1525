//! Dashboard statistics and the admin summary report.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use helpdesk_core::report::{
    priority_breakdown, status_breakdown, PriorityBreakdown, StatusBreakdown,
};
use helpdesk_core::search::RECENT_LIMIT;
use helpdesk_core::ticket::Ticket;
use helpdesk_db::models::customer::Customer;
use helpdesk_db::models::ticket::TicketFilters;
use helpdesk_db::repositories::{CustomerRepo, ReportRepo, TicketRepo};
use serde::Serialize;

use crate::error::AppResult;
use crate::middleware::rbac::{RequireAdmin, RequireAuth};
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct DashboardStats {
    pub tickets: StatusBreakdown,
    pub recent_tickets: Vec<Ticket>,
}

#[derive(Debug, Serialize)]
pub struct SummaryReport {
    pub total_customers: i64,
    pub tickets: StatusBreakdown,
    pub priorities: PriorityBreakdown,
    pub recent_customers: Vec<Customer>,
    pub recent_tickets: Vec<Ticket>,
}

/// GET /api/v1/dashboard
pub async fn dashboard(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let by_status = ReportRepo::count_tickets_by_status(&state.pool).await?;
    let recent_tickets =
        TicketRepo::list_filtered(&state.pool, &TicketFilters::default(), RECENT_LIMIT, 0)
            .await?;

    Ok(Json(DataResponse {
        data: DashboardStats {
            tickets: status_breakdown(&by_status),
            recent_tickets,
        },
    }))
}

/// GET /api/v1/reports/summary
pub async fn summary(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let total_customers = CustomerRepo::count(&state.pool).await?;
    let by_status = ReportRepo::count_tickets_by_status(&state.pool).await?;
    let by_priority = ReportRepo::count_tickets_by_priority(&state.pool).await?;
    let recent_customers = CustomerRepo::recent(&state.pool, RECENT_LIMIT).await?;
    let recent_tickets =
        TicketRepo::list_filtered(&state.pool, &TicketFilters::default(), RECENT_LIMIT, 0)
            .await?;

    Ok(Json(DataResponse {
        data: SummaryReport {
            total_customers,
            tickets: status_breakdown(&by_status),
            priorities: priority_breakdown(&by_priority),
            recent_customers,
            recent_tickets,
        },
    }))
}
