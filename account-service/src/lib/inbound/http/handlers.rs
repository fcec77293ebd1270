use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::Json;
use serde::Serialize;

use crate::domain::identity::errors::AuthError;
use crate::domain::identity::models::Identity;
use crate::domain::otp::errors::OtpError;

pub mod login;
pub mod register;
pub mod request_otp;
pub mod reset_password;
pub mod update_profile;
pub mod verify_otp;

#[derive(Debug, Clone)]
pub struct ApiSuccess<T: Serialize + PartialEq>(StatusCode, Json<ApiResponseBody<T>>);

impl<T> PartialEq for ApiSuccess<T>
where
    T: Serialize + PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0 && self.1 .0 == other.1 .0
    }
}

impl<T: Serialize + PartialEq> ApiSuccess<T> {
    pub fn new(status: StatusCode, data: T) -> Self {
        ApiSuccess(status, Json(ApiResponseBody::new(status, data)))
    }
}

impl<T: Serialize + PartialEq> IntoResponse for ApiSuccess<T> {
    fn into_response(self) -> Response {
        (self.0, self.1).into_response()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    InternalServerError(String),
    UnprocessableEntity(String),
    BadRequest(String),
    NotFound(String),
    Conflict(String),
    Unauthorized(String),
}

impl From<anyhow::Error> for ApiError {
    fn from(e: anyhow::Error) -> Self {
        Self::InternalServerError(e.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::InternalServerError(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
            ApiError::UnprocessableEntity(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
        };

        (status, Json(ApiResponseBody::new_error(status, message))).into_response()
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::NotRegistered(_) => ApiError::NotFound(err.to_string()),
            AuthError::AlreadyRegistered(_) => ApiError::Conflict(err.to_string()),
            AuthError::WrongPassword | AuthError::OtpNotVerified => {
                ApiError::Unauthorized(err.to_string())
            }
            AuthError::PasswordMismatch | AuthError::InvalidEmail(_) => {
                ApiError::UnprocessableEntity(err.to_string())
            }
            AuthError::Password(_)
            | AuthError::Token(_)
            | AuthError::DatabaseError(_)
            | AuthError::Unknown(_) => {
                // Full detail goes to the log only, never to the caller
                tracing::error!(error = %err, "auth flow failed");
                ApiError::InternalServerError("Internal error".to_string())
            }
        }
    }
}

impl From<OtpError> for ApiError {
    fn from(err: OtpError) -> Self {
        match err {
            OtpError::NotRegistered(_) => ApiError::NotFound(err.to_string()),
            OtpError::DeliveryFailed(_) => {
                tracing::error!(error = %err, "passcode delivery failed");
                ApiError::InternalServerError(
                    "Failed to send OTP email. Please try again.".to_string(),
                )
            }
            OtpError::InvalidCode(_) => ApiError::UnprocessableEntity(err.to_string()),
            OtpError::InvalidEmail(_) | OtpError::DatabaseError(_) => {
                tracing::error!(error = %err, "passcode flow failed");
                ApiError::InternalServerError("Internal error".to_string())
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiResponseBody<T: Serialize + PartialEq> {
    status_code: u16,
    data: T,
}

impl<T: Serialize + PartialEq> ApiResponseBody<T> {
    pub fn new(status_code: StatusCode, data: T) -> Self {
        Self {
            status_code: status_code.as_u16(),
            data,
        }
    }
}

impl ApiResponseBody<ApiErrorData> {
    pub fn new_error(status_code: StatusCode, message: String) -> Self {
        Self {
            status_code: status_code.as_u16(),
            data: ApiErrorData { message },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiErrorData {
    pub message: String,
}

/// Identity shape exposed to clients; the password hash never leaves the
/// domain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProfileData {
    pub id: String,
    pub email: String,
    pub full_name: Option<String>,
    pub organization: Option<String>,
    pub role: Option<String>,
    pub experience: Option<String>,
}

impl From<&Identity> for ProfileData {
    fn from(identity: &Identity) -> Self {
        Self {
            id: identity.id.to_string(),
            email: identity.email.to_string(),
            full_name: identity.full_name.clone(),
            organization: identity.organization.clone(),
            role: identity.role.clone(),
            experience: identity.experience.clone(),
        }
    }
}
