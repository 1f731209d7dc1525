//! Customer status constants and validation.

use crate::error::CoreError;

pub const STATUS_ACTIVE: &str = "active";
pub const STATUS_INACTIVE: &str = "inactive";
pub const STATUS_PENDING: &str = "pending";

/// All statuses a customer record can hold.
pub const VALID_STATUSES: &[&str] = &[STATUS_ACTIVE, STATUS_INACTIVE, STATUS_PENDING];

/// List filter value meaning "any status". Never stored.
pub const FILTER_ALL: &str = "all";

/// Validate a stored customer status.
pub fn validate_status(status: &str) -> Result<(), CoreError> {
    if VALID_STATUSES.contains(&status) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Invalid customer status '{status}'. Must be one of: {}",
            VALID_STATUSES.join(", ")
        )))
    }
}

/// Normalize a status list filter: `all` and empty mean no filter, anything
/// else must be a valid status.
pub fn status_filter(filter: Option<&str>) -> Result<Option<&str>, CoreError> {
    match filter {
        None | Some("") | Some(FILTER_ALL) => Ok(None),
        Some(status) => validate_status(status).map(|()| Some(status)),
    }
}
