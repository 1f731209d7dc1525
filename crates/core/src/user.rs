//! User account rules.

use crate::error::CoreError;

/// Minimum password length enforced on account creation and password change.
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Validate that a password meets the minimum length.
pub fn validate_password_strength(password: &str) -> Result<(), CoreError> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(CoreError::Validation(format!(
            "Password must be at least {MIN_PASSWORD_LENGTH} characters long"
        )));
    }
    Ok(())
}

/// Derive a default username from an email address (the local part).
pub fn username_from_email(email: &str) -> &str {
    email.split('@').next().unwrap_or(email)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_password_rejected() {
        let err = validate_password_strength("pass").unwrap_err();
        assert!(err.to_string().contains("at least 8 characters"));
    }

    #[test]
    fn password_at_minimum_accepted() {
        assert!(validate_password_strength("password").is_ok());
    }

    #[test]
    fn username_is_local_part() {
        assert_eq!(username_from_email("siti@isp.co.id"), "siti");
        assert_eq!(username_from_email("nodomain"), "nodomain");
    }
}
