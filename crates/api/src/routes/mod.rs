pub mod auth;
pub mod customers;
pub mod health;
pub mod reports;
pub mod tickets;
pub mod users;

use axum::routing::get;
use axum::Router;

use crate::handlers;
use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// ```text
/// /auth/login                        login (public)
/// /auth/me                           current user
///
/// /dashboard                         status counts, recent tickets
///
/// /tickets                           list, create
/// /tickets/bulk-delete               bulk delete (admin)
/// /tickets/{id}                      get, update, delete
/// /tickets/{id}/status               transition (any role)
/// /tickets/{id}/assign               assign
/// /tickets/{id}/history              status history
///
/// /customers                         list, create
/// /customers/{id}                    get, update, delete
/// /customers/{id}/tickets            tickets for one customer
///
/// /users                             list, create (admin)
/// /users/{id}                        get, update, deactivate (admin)
///
/// /reports/summary                   admin summary report
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .route("/dashboard", get(handlers::reports::dashboard))
        .nest("/tickets", tickets::router())
        .nest("/customers", customers::router())
        .nest("/users", users::router())
        .nest("/reports", reports::router())
}
