use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::domain::identity::models::EmailAddress;
use crate::domain::otp::models::OtpCode;
use crate::domain::otp::ports::OtpServicePort;
use crate::inbound::http::router::AppState;

pub async fn verify_otp(
    State(state): State<AppState>,
    Json(body): Json<VerifyOtpRequest>,
) -> Result<ApiSuccess<VerifyOtpResponseData>, ApiError> {
    let email = EmailAddress::new(body.email)?;

    // A code that is not even six digits cannot match any record
    let verified = match OtpCode::new(body.otp) {
        Ok(code) => state.otp_service.verify(&email, &code).await?,
        Err(_) => false,
    };

    Ok(ApiSuccess::new(
        StatusCode::OK,
        VerifyOtpResponseData { verified },
    ))
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct VerifyOtpRequest {
    email: String,
    otp: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VerifyOtpResponseData {
    pub verified: bool,
}
