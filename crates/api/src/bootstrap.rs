//! First-run admin account.
//!
//! A fresh database has no users, and every route except login requires a
//! token. When `BOOTSTRAP_ADMIN_EMAIL` and `BOOTSTRAP_ADMIN_PASSWORD` are
//! set, startup creates one admin so the first login is possible.

use helpdesk_core::error::CoreError;
use helpdesk_core::roles::ROLE_ADMIN;
use helpdesk_core::user::{username_from_email, validate_password_strength};
use helpdesk_db::models::user::{CreateUser, User};
use helpdesk_db::repositories::UserRepo;
use sqlx::PgPool;

use crate::auth::password::hash_password;
use crate::config::BootstrapAdmin;
use crate::error::{AppError, AppResult};

/// Display name given to the bootstrap account.
pub const BOOTSTRAP_ADMIN_NAME: &str = "Administrator";

/// Create the bootstrap admin if the users table is empty.
///
/// Returns the created user, or `None` when users already exist.
pub async fn ensure_admin(pool: &PgPool, admin: &BootstrapAdmin) -> AppResult<Option<User>> {
    if UserRepo::count(pool).await? > 0 {
        return Ok(None);
    }

    validate_password_strength(&admin.password)?;
    if !admin.email.contains('@') {
        return Err(AppError::Core(CoreError::Validation(
            "BOOTSTRAP_ADMIN_EMAIL must be an email address".into(),
        )));
    }

    let password_hash = hash_password(&admin.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let input = CreateUser {
        username: username_from_email(&admin.email).to_string(),
        email: admin.email.clone(),
        name: BOOTSTRAP_ADMIN_NAME.to_string(),
        password_hash,
        role: ROLE_ADMIN.to_string(),
        avatar: None,
    };
    let user = UserRepo::create(pool, &input).await?;
    Ok(Some(user))
}
