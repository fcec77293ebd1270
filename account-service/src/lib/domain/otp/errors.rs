use thiserror::Error;

use crate::domain::identity::errors::EmailError;

/// Error for passcode format violations
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum OtpCodeError {
    #[error("Passcode must be exactly six digits")]
    InvalidFormat,
}

/// Error for notification delivery operations
#[derive(Debug, Clone, Error)]
pub enum NotificationError {
    #[error("Failed to build message: {0}")]
    InvalidMessage(String),

    #[error("Failed to send message: {0}")]
    SendFailed(String),
}

/// Top-level error for the passcode lifecycle.
#[derive(Debug, Clone, Error)]
pub enum OtpError {
    #[error("You are not registered: {0}")]
    NotRegistered(String),

    #[error("Failed to deliver one-time passcode: {0}")]
    DeliveryFailed(String),

    #[error("Invalid passcode: {0}")]
    InvalidCode(#[from] OtpCodeError),

    #[error("Invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl From<NotificationError> for OtpError {
    fn from(err: NotificationError) -> Self {
        OtpError::DeliveryFailed(err.to_string())
    }
}
