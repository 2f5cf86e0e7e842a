//! Errors surfaced to callers.
//!
//! Only credential entry can fail from the caller's point of view. Storage failures
//! are handled inside the repository and session store (see
//! [`StorageError`](crate::storage::StorageError)).

use thiserror::Error;

/// Minimum accepted password length, in characters.
pub const MIN_PASSWORD_LEN: usize = 6;

/// Rejected login or registration input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Login was attempted with an empty email or password.
    #[error("Email and password are required")]
    MissingCredentials,

    /// Registration was attempted with at least one empty field.
    #[error("All fields are required")]
    MissingFields,

    /// Registration password shorter than [`MIN_PASSWORD_LEN`].
    #[error("Password must be at least {min} characters")]
    PasswordTooShort {
        /// Required minimum length.
        min: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn password_message_names_minimum() {
        let err = ValidationError::PasswordTooShort {
            min: MIN_PASSWORD_LEN,
        };
        assert_eq!(err.to_string(), "Password must be at least 6 characters");
    }
}
