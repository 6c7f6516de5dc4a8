//! Password change request and its client-side checks.

use serde::Serialize;

use crate::error::CoreError;

/// Minimum accepted length for a new password.
pub const MIN_PASSWORD_LENGTH: usize = 8;

#[derive(Clone, Serialize)]
pub struct PasswordReset {
    pub old_password: String,
    pub new_password: String,
    #[serde(rename = "new_password_confirmation")]
    pub confirmation: String,
}

impl std::fmt::Debug for PasswordReset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("PasswordReset { .. }")
    }
}

impl PasswordReset {
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.new_password != self.confirmation {
            return Err(CoreError::Validation(
                "new password and confirmation do not match".to_string(),
            ));
        }
        if self.new_password.chars().count() < MIN_PASSWORD_LENGTH {
            return Err(CoreError::Validation(format!(
                "password must be at least {MIN_PASSWORD_LENGTH} characters long"
            )));
        }
        Ok(())
    }
}
