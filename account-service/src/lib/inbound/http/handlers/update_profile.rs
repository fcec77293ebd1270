use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use axum::Json;
use serde::Deserialize;

use super::ApiError;
use super::ApiSuccess;
use super::ProfileData;
use crate::domain::identity::models::UpdateProfileCommand;
use crate::domain::identity::ports::AuthServicePort;
use crate::inbound::http::middleware::AuthenticatedSubject;
use crate::inbound::http::router::AppState;

pub async fn update_profile(
    State(state): State<AppState>,
    Extension(subject): Extension<AuthenticatedSubject>,
    Json(body): Json<UpdateProfileRequest>,
) -> Result<ApiSuccess<ProfileData>, ApiError> {
    let command = UpdateProfileCommand {
        email: subject.email,
        full_name: body.full_name,
        organization: body.organization,
        role: body.role,
        experience: body.experience,
    };

    state
        .auth_service
        .update_profile(command)
        .await
        .map_err(ApiError::from)
        .map(|ref identity| ApiSuccess::new(StatusCode::OK, identity.into()))
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UpdateProfileRequest {
    full_name: Option<String>,
    organization: Option<String>,
    role: Option<String>,
    experience: Option<String>,
}
