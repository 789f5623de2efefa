//! Password policy enforcement for new passwords.

use gallery_core::config::AuthConfig;
use gallery_core::error::AppError;

/// Validates new passwords against the configured policy.
#[derive(Debug, Clone)]
pub struct PasswordValidator {
    /// Minimum password length, in characters.
    min_length: usize,
}

impl PasswordValidator {
    /// Creates a new validator from auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            min_length: config.password_min_length,
        }
    }

    /// Validates a password against the policy.
    pub fn validate(&self, password: &str) -> Result<(), AppError> {
        if password.chars().count() < self.min_length {
            return Err(AppError::invalid_input(format!(
                "Password must be at least {} characters long",
                self.min_length
            )));
        }
        if password.trim().is_empty() {
            return Err(AppError::invalid_input("Password must not be blank"));
        }
        Ok(())
    }

    /// Validates that a new password differs from the old one.
    pub fn validate_not_same(
        &self,
        old_password: &str,
        new_password: &str,
    ) -> Result<(), AppError> {
        if old_password == new_password {
            return Err(AppError::invalid_input(
                "New password must be different from the current password",
            ));
        }
        Ok(())
    }
}
