//! Route definitions for the `/customers` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::customers;
use crate::state::AppState;

/// Routes mounted at `/customers`.
///
/// ```text
/// GET    /               -> list_customers
/// POST   /               -> create_customer   (admin, cs)
/// GET    /{id}           -> get_customer
/// PUT    /{id}           -> update_customer   (admin, cs)
/// DELETE /{id}           -> delete_customer   (admin, cs)
/// GET    /{id}/tickets   -> customer_tickets
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(customers::list_customers).post(customers::create_customer),
        )
        .route(
            "/{id}",
            get(customers::get_customer)
                .put(customers::update_customer)
                .delete(customers::delete_customer),
        )
        .route("/{id}/tickets", get(customers::customer_tickets))
}
