//! Well-known role names and the capabilities attached to each.
//!
//! These must match the `chk_users_role` constraint in
//! `20240501000002_create_users.sql`.

use crate::error::CoreError;

/// Full access, including user management and reports.
pub const ROLE_ADMIN: &str = "admin";
/// Customer service: manages customers and tickets.
pub const ROLE_CS: &str = "cs";
/// Network operations: views records and moves tickets through statuses.
pub const ROLE_NOC: &str = "noc";

/// All valid role names.
pub const VALID_ROLES: &[&str] = &[ROLE_ADMIN, ROLE_CS, ROLE_NOC];

/// Validate that a role string is one of the known roles.
pub fn validate_role(role: &str) -> Result<(), CoreError> {
    if VALID_ROLES.contains(&role) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Invalid role '{role}'. Must be one of: {}",
            VALID_ROLES.join(", ")
        )))
    }
}

/// Whether the role may create, edit, assign and delete tickets and
/// customer records.
pub fn can_manage_records(role: &str) -> bool {
    role == ROLE_ADMIN || role == ROLE_CS
}

/// Whether the role may manage users and read admin reports.
pub fn is_admin(role: &str) -> bool {
    role == ROLE_ADMIN
}
