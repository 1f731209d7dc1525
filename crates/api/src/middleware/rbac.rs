//! Role gates for handlers.
//!
//! | Extractor        | Roles            | Used for                               |
//! |------------------|------------------|----------------------------------------|
//! | [`RequireAuth`]    | admin, cs, noc   | reads, dashboard, ticket status moves  |
//! | [`RequireSupport`] | admin, cs        | customer and ticket maintenance        |
//! | [`RequireAdmin`]   | admin            | users, summary report, bulk delete     |

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use helpdesk_core::error::CoreError;
use helpdesk_core::roles::{can_manage_records, is_admin};

use super::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

/// Requires the `admin` role. Rejects with 403 Forbidden otherwise.
/// See [`crate::handlers::reports::summary`] for a typical use.
pub struct RequireAdmin(pub AuthUser);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if !is_admin(&user.role) {
            return Err(AppError::Core(CoreError::Forbidden(
                "Admin role required".into(),
            )));
        }
        Ok(RequireAdmin(user))
    }
}

/// Requires `admin` or `cs`: the roles that maintain customer and ticket
/// records. Rejects with 403 Forbidden otherwise.
pub struct RequireSupport(pub AuthUser);

impl FromRequestParts<AppState> for RequireSupport {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if !can_manage_records(&user.role) {
            return Err(AppError::Core(CoreError::Forbidden(
                "Admin or CS role required".into(),
            )));
        }
        Ok(RequireSupport(user))
    }
}

/// Any signed-in user. Same as taking [`AuthUser`] directly, but reads as an
/// explicit gate next to the other two.
pub struct RequireAuth(pub AuthUser);

impl FromRequestParts<AppState> for RequireAuth {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        Ok(RequireAuth(user))
    }
}
