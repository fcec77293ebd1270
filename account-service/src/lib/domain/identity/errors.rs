use thiserror::Error;

use crate::domain::otp::errors::OtpError;

/// Error for IdentityId parsing failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum IdentityIdError {
    #[error("Invalid UUID format: {0}")]
    InvalidFormat(String),
}

/// Error for EmailAddress validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EmailError {
    #[error("Invalid email format: {0}")]
    InvalidFormat(String),
}

/// Top-level error for the register, login, reset, and profile flows.
///
/// Validation, not-found, and authentication failures are recovered at the
/// flow boundary as typed reasons; `DatabaseError` and `Unknown` carry
/// dependency failures whose detail belongs in the log, not the response.
#[derive(Debug, Clone, Error)]
pub enum AuthError {
    // Value object validation errors (automatically converted via #[from])
    #[error("Invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    #[error("Password error: {0}")]
    Password(#[from] auth::PasswordError),

    #[error("Token error: {0}")]
    Token(#[from] auth::TokenError),

    // Domain-level errors
    #[error("User already registered: {0}")]
    AlreadyRegistered(String),

    #[error("Passwords do not match")]
    PasswordMismatch,

    #[error("You are not registered: {0}")]
    NotRegistered(String),

    #[error("Wrong password")]
    WrongPassword,

    #[error("OTP not verified or expired")]
    OtpNotVerified,

    // Infrastructure errors
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl From<OtpError> for AuthError {
    fn from(err: OtpError) -> Self {
        match err {
            OtpError::NotRegistered(email) => AuthError::NotRegistered(email),
            OtpError::DatabaseError(msg) => AuthError::DatabaseError(msg),
            other => AuthError::Unknown(other.to_string()),
        }
    }
}

impl From<anyhow::Error> for AuthError {
    fn from(err: anyhow::Error) -> Self {
        AuthError::Unknown(err.to_string())
    }
}
