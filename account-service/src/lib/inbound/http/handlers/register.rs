use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use super::ApiError;
use super::ApiSuccess;
use super::ProfileData;
use crate::domain::identity::errors::EmailError;
use crate::domain::identity::models::EmailAddress;
use crate::domain::identity::models::RegisterCommand;
use crate::domain::identity::ports::AuthServicePort;
use crate::inbound::http::router::AppState;

pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> Result<ApiSuccess<ProfileData>, ApiError> {
    state
        .auth_service
        .register(body.try_into_command()?)
        .await
        .map_err(ApiError::from)
        .map(|ref identity| ApiSuccess::new(StatusCode::CREATED, identity.into()))
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RegisterRequest {
    email: String,
    password: String,
    confirm_password: String,
    full_name: Option<String>,
    organization: Option<String>,
    role: Option<String>,
    experience: Option<String>,
}

impl RegisterRequest {
    fn try_into_command(self) -> Result<RegisterCommand, EmailError> {
        Ok(RegisterCommand {
            email: EmailAddress::new(self.email)?,
            password: self.password,
            confirm_password: self.confirm_password,
            full_name: self.full_name,
            organization: self.organization,
            role: self.role,
            experience: self.experience,
        })
    }
}

impl From<EmailError> for ApiError {
    fn from(err: EmailError) -> Self {
        ApiError::UnprocessableEntity(err.to_string())
    }
}
