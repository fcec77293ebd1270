use anyhow::Context;
use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::AsyncSmtpTransport;
use lettre::AsyncTransport;
use lettre::Message;
use lettre::Tokio1Executor;

use crate::config::SmtpConfig;
use crate::domain::identity::models::EmailAddress;
use crate::domain::otp::errors::NotificationError;
use crate::domain::otp::ports::NotificationGateway;

/// SMTP-backed notification gateway for passcode delivery.
pub struct SmtpNotificationGateway {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpNotificationGateway {
    pub fn new(config: &SmtpConfig) -> Result<Self, anyhow::Error> {
        let from: Mailbox = config
            .from
            .parse()
            .context("invalid smtp.from mailbox address")?;

        let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(&config.host)
            .context("failed to create SMTP transport")?
            .credentials(Credentials::new(
                config.username.clone(),
                config.password.clone(),
            ))
            .port(config.port)
            .build();

        Ok(Self { transport, from })
    }
}

#[async_trait]
impl NotificationGateway for SmtpNotificationGateway {
    async fn send(
        &self,
        to: &EmailAddress,
        subject: &str,
        body: &str,
    ) -> Result<(), NotificationError> {
        let message = Message::builder()
            .from(self.from.clone())
            .to(to
                .as_str()
                .parse()
                .map_err(|e| NotificationError::InvalidMessage(format!("recipient: {}", e)))?)
            .subject(subject)
            .header(ContentType::TEXT_PLAIN)
            .body(body.to_string())
            .map_err(|e| NotificationError::InvalidMessage(e.to_string()))?;

        tracing::debug!(to = %to, "dispatching email");
        self.transport
            .send(message)
            .await
            .map(|_| ())
            .map_err(|e| NotificationError::SendFailed(e.to_string()))
    }
}
