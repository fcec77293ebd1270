use thiserror::Error;

/// Error type for token operations.
///
/// [`crate::TokenService::verify`] collapses every decoding failure to
/// "invalid" for the caller; these variants exist so each failure class can
/// be logged distinctly and so `extract_subject` can fail with a typed error.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("Failed to encode token: {0}")]
    EncodingFailed(String),

    #[error("Token is expired")]
    Expired,

    #[error("Token signature does not match")]
    SignatureMismatch,

    #[error("Token algorithm is not supported")]
    UnsupportedAlgorithm,

    #[error("Token is malformed: {0}")]
    Malformed(String),
}
