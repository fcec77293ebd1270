use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::Request;
use axum::http::Response;
use axum::middleware;
use axum::routing::get;
use axum::routing::patch;
use axum::routing::post;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::Span;

use super::handlers::login::login;
use super::handlers::register::register;
use super::handlers::request_otp::request_otp;
use super::handlers::reset_password::reset_password;
use super::handlers::update_profile::update_profile;
use super::handlers::verify_otp::verify_otp;
use super::middleware::authenticate as auth_middleware;
use crate::domain::identity::service::AuthService;
use crate::domain::otp::service::OtpService;
use crate::outbound::notifications::SmtpNotificationGateway;
use crate::outbound::repositories::PostgresCredentialStore;
use crate::outbound::repositories::PostgresOtpStore;

pub type LiveAuthService =
    AuthService<PostgresCredentialStore, PostgresOtpStore, SmtpNotificationGateway>;
pub type LiveOtpService =
    OtpService<PostgresCredentialStore, PostgresOtpStore, SmtpNotificationGateway>;

#[derive(Clone)]
pub struct AppState {
    pub auth_service: Arc<LiveAuthService>,
    pub otp_service: Arc<LiveOtpService>,
    pub tokens: Arc<auth::TokenService>,
}

pub fn create_router(
    auth_service: Arc<LiveAuthService>,
    otp_service: Arc<LiveOtpService>,
    tokens: Arc<auth::TokenService>,
) -> Router {
    let state = AppState {
        auth_service,
        otp_service,
        tokens,
    };

    let public_routes = Router::new()
        .route("/api/auth/register", post(register))
        .route("/api/auth/login", post(login))
        .route("/api/auth/forgot-password/request", post(request_otp))
        .route("/api/auth/forgot-password/verify", post(verify_otp))
        .route("/api/auth/forgot-password/reset", post(reset_password))
        .route("/api/auth/health", get(health));

    let protected_routes = Router::new()
        .route("/api/auth/profile", patch(update_profile))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|request: &Request<Body>| {
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                uri = %request.uri(),
                version = ?request.version(),
            )
        })
        .on_request(|request: &Request<Body>, _span: &Span| {
            tracing::info!(
                method = %request.method(),
                uri = %request.uri(),
                "Request started"
            );
        })
        .on_response(
            |response: &Response<Body>, latency: Duration, _span: &Span| {
                tracing::info!(
                    status = response.status().as_u16(),
                    latency_ms = latency.as_millis(),
                    "Request completed"
                );
            },
        );

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(trace_layer)
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn health() -> &'static str {
    "success"
}
