//! Route definitions for the `/tickets` resource.

use axum::routing::{get, patch, post};
use axum::Router;

use crate::handlers::tickets;
use crate::state::AppState;

/// Routes mounted at `/tickets`.
///
/// ```text
/// GET    /                -> list_tickets
/// POST   /                -> create_ticket      (admin, cs)
/// POST   /bulk-delete     -> bulk_delete_tickets (admin)
/// GET    /{id}            -> get_ticket
/// PUT    /{id}            -> update_ticket      (admin, cs)
/// DELETE /{id}            -> delete_ticket      (admin, cs)
/// PATCH  /{id}/status     -> update_status
/// PATCH  /{id}/assign     -> assign_ticket      (admin, cs)
/// GET    /{id}/history    -> ticket_history
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(tickets::list_tickets).post(tickets::create_ticket))
        .route("/bulk-delete", post(tickets::bulk_delete_tickets))
        .route(
            "/{id}",
            get(tickets::get_ticket)
                .put(tickets::update_ticket)
                .delete(tickets::delete_ticket),
        )
        .route("/{id}/status", patch(tickets::update_status))
        .route("/{id}/assign", patch(tickets::assign_ticket))
        .route("/{id}/history", get(tickets::ticket_history))
}
