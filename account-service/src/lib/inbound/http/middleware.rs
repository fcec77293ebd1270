use axum::extract::Request;
use axum::extract::State;
use axum::http::StatusCode;
use axum::http::{self};
use axum::middleware::Next;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::Json;
use serde_json::json;

use crate::domain::identity::models::EmailAddress;
use crate::inbound::http::router::AppState;

/// Extension type carrying the authenticated token subject.
#[derive(Debug, Clone)]
pub struct AuthenticatedSubject {
    pub email: EmailAddress,
}

/// Middleware that validates bearer tokens and stores the subject in
/// request extensions.
pub async fn authenticate(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, Response> {
    let token = extract_token_from_header(&req)?;

    // Safe-by-default check first; all failure classes collapse to 401
    if state.tokens.verify(token).is_none() {
        return Err((
            StatusCode::UNAUTHORIZED,
            Json(json!({
                "error": "Invalid or expired token"
            })),
        )
            .into_response());
    }

    // The token just passed verification, so a failure here is a contract
    // violation rather than a user-facing condition
    let subject = state.tokens.extract_subject(token).map_err(|e| {
        tracing::error!(error = %e, "subject extraction failed after verification");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({
                "error": "Internal error"
            })),
        )
            .into_response()
    })?;

    let email = EmailAddress::new(subject).map_err(|e| {
        tracing::error!(error = %e, "token subject is not a valid email");
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({
                "error": "Invalid token format"
            })),
        )
            .into_response()
    })?;

    req.extensions_mut().insert(AuthenticatedSubject { email });

    Ok(next.run(req).await)
}

fn extract_token_from_header(req: &Request) -> Result<&str, Response> {
    let auth_header = req
        .headers()
        .get(http::header::AUTHORIZATION)
        .ok_or_else(|| {
            (
                StatusCode::UNAUTHORIZED,
                Json(json!({
                    "error": "Missing Authorization header"
                })),
            )
                .into_response()
        })?;

    let auth_str = auth_header.to_str().map_err(|_| {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({
                "error": "Invalid Authorization header"
            })),
        )
            .into_response()
    })?;

    if !auth_str.starts_with("Bearer ") {
        return Err((
            StatusCode::UNAUTHORIZED,
            Json(json!({
                "error": "Invalid Authorization header format. Expected: Bearer <token>"
            })),
        )
            .into_response());
    }

    Ok(auth_str.trim_start_matches("Bearer "))
}
