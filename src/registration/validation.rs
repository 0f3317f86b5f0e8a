use regex::Regex;
use thiserror::Error;

/// RFC 5321 path limit.
pub const MAX_EMAIL_LEN: usize = 254;
/// Upper bound on password bytes fed to Argon2.
pub const MAX_PASSWORD_LEN: usize = 1024;

// Messages name the field only; request values never end up in errors.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    #[error("missing email")]
    MissingEmail,
    #[error("invalid email")]
    InvalidEmail,
    #[error("missing password")]
    MissingPassword,
    #[error("password too long")]
    PasswordTooLong,
}

/// Trim and lower-case `email`, then check it looks like an address.
///
/// # Errors
/// Returns `ValidationError::MissingEmail` or `ValidationError::InvalidEmail`.
pub fn normalize_email(email: &str) -> Result<String, ValidationError> {
    let email = email.trim().to_lowercase();

    if email.is_empty() {
        return Err(ValidationError::MissingEmail);
    }

    if email.len() > MAX_EMAIL_LEN || !valid_email(&email) {
        return Err(ValidationError::InvalidEmail);
    }

    Ok(email)
}

pub(super) fn check_password(password: &str) -> Result<(), ValidationError> {
    if password.is_empty() {
        return Err(ValidationError::MissingPassword);
    }
    if password.len() > MAX_PASSWORD_LEN {
        return Err(ValidationError::PasswordTooLong);
    }
    Ok(())
}

fn valid_email(email: &str) -> bool {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").is_ok_and(|re| re.is_match(email))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_case_and_whitespace() {
        assert_eq!(
            normalize_email(" Bob@Example.ORG\n"),
            Ok("bob@example.org".to_string())
        );
    }

    #[test]
    fn rejects_missing_and_malformed_email() {
        assert_eq!(normalize_email(""), Err(ValidationError::MissingEmail));
        assert_eq!(normalize_email("   "), Err(ValidationError::MissingEmail));
        for bad in ["bob", "bob@", "@example.com", "bob@example", "b ob@example.com", "a@b@c.com"] {
            assert_eq!(normalize_email(bad), Err(ValidationError::InvalidEmail), "{bad}");
        }
    }

    #[test]
    fn rejects_overlong_email() {
        let email = format!("{}@example.com", "a".repeat(MAX_EMAIL_LEN));
        assert_eq!(normalize_email(&email), Err(ValidationError::InvalidEmail));
    }

    #[test]
    fn password_bounds() {
        assert_eq!(check_password(""), Err(ValidationError::MissingPassword));
        assert!(check_password("correct horse").is_ok());
        assert!(check_password(&"x".repeat(MAX_PASSWORD_LEN)).is_ok());
        assert_eq!(
            check_password(&"x".repeat(MAX_PASSWORD_LEN + 1)),
            Err(ValidationError::PasswordTooLong)
        );
    }

    #[test]
    fn whitespace_password_is_accepted() {
        // passphrases may legitimately be spaces only
        assert!(check_password("   ").is_ok());
    }
}
