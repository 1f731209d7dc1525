use axum::routing::get;
use axum::Router;

use crate::handlers::reports;
use crate::state::AppState;

/// Routes mounted at `/reports`.
///
/// ```text
/// GET /summary   -> summary (admin)
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/summary", get(reports::summary))
}
