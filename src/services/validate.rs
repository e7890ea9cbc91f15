//! Form field validation
//!
//! Superficial console-side checks run before any network call; the backend
//! re-validates everything authoritatively.

use crate::backend::ClientError;

/// Minimum password length accepted by the backend.
pub const MIN_PASSWORD_LEN: usize = 8;

pub fn require(field: &str, value: &str) -> Result<(), ClientError> {
    if value.trim().is_empty() {
        return Err(ClientError::validation(field, "is required"));
    }
    Ok(())
}

/// Loose email shape check: something, an `@`, something with a dot.
pub fn email(field: &str, value: &str) -> Result<(), ClientError> {
    require(field, value)?;
    let valid = match value.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty() && domain.contains('.') && !domain.starts_with('.') && !domain.ends_with('.')
        }
        None => false,
    };
    if !valid {
        return Err(ClientError::validation(
            field,
            "must look like an email address",
        ));
    }
    Ok(())
}

pub fn password(field: &str, value: &str) -> Result<(), ClientError> {
    require(field, value)?;
    if value.len() < MIN_PASSWORD_LEN {
        return Err(ClientError::validation(
            field,
            format!("must be at least {} characters", MIN_PASSWORD_LEN),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_values_fail_require() {
        assert!(require("name", "Ada").is_ok());
        assert!(require("name", "   ").is_err());
    }

    #[test]
    fn email_shape() {
        assert!(email("email", "ada@example.com").is_ok());
        assert!(email("email", "not-an-email").is_err());
        assert!(email("email", "@example.com").is_err());
        assert!(email("email", "ada@nodot").is_err());
        assert!(email("email", "ada@.com").is_err());
    }

    #[test]
    fn short_passwords_fail() {
        assert!(password("password", "longenough").is_ok());
        let err = password("password", "short").unwrap_err();
        assert!(matches!(err, ClientError::Validation { .. }));
    }
}
