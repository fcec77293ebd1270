use std::sync::Arc;

use account_service::config::Config;
use account_service::domain::identity::service::AuthService;
use account_service::domain::otp::service::OtpService;
use account_service::inbound::http::router::create_router;
use account_service::outbound::notifications::SmtpNotificationGateway;
use account_service::outbound::repositories::PostgresCredentialStore;
use account_service::outbound::repositories::PostgresOtpStore;
use chrono::Duration;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "account_service=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        service = "account-service",
        version = env!("CARGO_PKG_VERSION"),
        "Service starting"
    );

    let config = Config::load()?;

    tracing::info!(
        http_port = config.server.http_port,
        token_ttl_secs = config.jwt.expiration_secs,
        smtp_host = %config.smtp.host,
        dispatch = ?config.notifications.dispatch,
        "Configuration loaded"
    );

    let pg_pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&config.database.url)
        .await?;
    tracing::info!(
        max_connections = 5,
        database = "postgresql",
        "Database connection pool created"
    );

    sqlx::migrate!("./migrations").run(&pg_pool).await?;
    tracing::info!(database = "postgresql", "Database migrations completed");

    let tokens = Arc::new(auth::TokenService::new(
        config.jwt.secret.as_bytes(),
        Duration::seconds(config.jwt.expiration_secs),
    ));
    let credential_store = Arc::new(PostgresCredentialStore::new(pg_pool.clone()));
    let otp_store = Arc::new(PostgresOtpStore::new(pg_pool));
    let gateway = Arc::new(SmtpNotificationGateway::new(&config.smtp)?);

    let otp_service = Arc::new(OtpService::new(
        Arc::clone(&credential_store),
        otp_store,
        gateway,
        config.notifications.dispatch,
    ));
    let auth_service = Arc::new(AuthService::new(
        credential_store,
        Arc::clone(&otp_service),
        Arc::clone(&tokens),
    ));

    let http_address = format!("0.0.0.0:{}", config.server.http_port);
    let http_listener = tokio::net::TcpListener::bind(&http_address).await?;
    tracing::info!(
        address = %http_address,
        port = config.server.http_port,
        protocol = "http",
        "Http server listening"
    );

    let application = create_router(auth_service, otp_service, tokens);
    axum::serve(http_listener, application).await?;

    Ok(())
}
