use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::domain::identity::models::EmailAddress;
use crate::domain::otp::ports::OtpServicePort;
use crate::inbound::http::router::AppState;

pub async fn request_otp(
    State(state): State<AppState>,
    Json(body): Json<RequestOtpRequest>,
) -> Result<ApiSuccess<RequestOtpResponseData>, ApiError> {
    let email = EmailAddress::new(body.email)?;

    state.otp_service.request(&email).await?;

    Ok(ApiSuccess::new(
        StatusCode::OK,
        RequestOtpResponseData {
            message: "OTP sent to your registered email address.".to_string(),
        },
    ))
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RequestOtpRequest {
    email: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RequestOtpResponseData {
    pub message: String,
}
