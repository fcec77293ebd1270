use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;

use crate::domain::identity::models::EmailAddress;
use crate::domain::identity::ports::CredentialStore;
use crate::domain::otp::errors::OtpError;
use crate::domain::otp::models::DispatchMode;
use crate::domain::otp::models::OtpCode;
use crate::domain::otp::models::OtpRecord;
use crate::domain::otp::models::OTP_TTL_MINUTES;
use crate::domain::otp::ports::NotificationGateway;
use crate::domain::otp::ports::OtpServicePort;
use crate::domain::otp::ports::OtpStore;

const OTP_MAIL_SUBJECT: &str = "OTP for Password Reset";

/// Passcode lifecycle manager.
///
/// Drives records through `created -> verified`; expiry is checked at read
/// time and never written back. A new request does not invalidate older
/// outstanding codes for the same email, so several may be live at once.
pub struct OtpService<CS, OS, NG>
where
    CS: CredentialStore,
    OS: OtpStore,
    NG: NotificationGateway,
{
    credentials: Arc<CS>,
    records: Arc<OS>,
    gateway: Arc<NG>,
    dispatch: DispatchMode,
}

impl<CS, OS, NG> OtpService<CS, OS, NG>
where
    CS: CredentialStore,
    OS: OtpStore,
    NG: NotificationGateway,
{
    /// Create a new passcode service with injected dependencies.
    pub fn new(
        credentials: Arc<CS>,
        records: Arc<OS>,
        gateway: Arc<NG>,
        dispatch: DispatchMode,
    ) -> Self {
        Self {
            credentials,
            records,
            gateway,
            dispatch,
        }
    }

    fn mail_body(code: &OtpCode) -> String {
        format!(
            "Your OTP code is: {}\n\nThis will expire in {} minutes.",
            code, OTP_TTL_MINUTES
        )
    }
}

#[async_trait]
impl<CS, OS, NG> OtpServicePort for OtpService<CS, OS, NG>
where
    CS: CredentialStore,
    OS: OtpStore,
    NG: NotificationGateway,
{
    async fn request(&self, email: &EmailAddress) -> Result<(), OtpError> {
        tracing::info!(email = %email, "initiating passcode generation");

        let registered = self
            .credentials
            .exists_by_email(email)
            .await
            .map_err(|e| OtpError::DatabaseError(e.to_string()))?;
        if !registered {
            tracing::warn!(email = %email, "passcode request for unregistered email");
            return Err(OtpError::NotRegistered(email.to_string()));
        }

        let code = OtpCode::generate();
        let record = self
            .records
            .save(OtpRecord::issue(email.clone(), code.clone()))
            .await?;
        tracing::debug!(
            email = %email,
            expires_at = %record.expires_at,
            "passcode record saved"
        );

        let body = Self::mail_body(&code);
        match self.dispatch {
            DispatchMode::Sync => {
                // The record stays persisted when delivery fails; there is
                // no rollback (known gap, kept from the original flow).
                self.gateway
                    .send(email, OTP_MAIL_SUBJECT, &body)
                    .await
                    .map_err(|e| {
                        tracing::error!(email = %email, error = %e, "failed to send passcode email");
                        OtpError::from(e)
                    })?;
                tracing::info!(email = %email, "passcode email sent");
            }
            DispatchMode::Deferred => {
                let gateway = Arc::clone(&self.gateway);
                let to = email.clone();
                tokio::spawn(async move {
                    match gateway.send(&to, OTP_MAIL_SUBJECT, &body).await {
                        Ok(()) => tracing::info!(email = %to, "passcode email sent"),
                        Err(e) => {
                            tracing::error!(email = %to, error = %e, "failed to send passcode email")
                        }
                    }
                });
            }
        }

        Ok(())
    }

    async fn verify(&self, email: &EmailAddress, code: &OtpCode) -> Result<bool, OtpError> {
        tracing::info!(email = %email, "verifying passcode");

        let record = self
            .records
            .find_by_email_and_code_unverified(email, code)
            .await?;
        let Some(mut record) = record else {
            tracing::warn!(email = %email, "passcode not found or already used");
            return Ok(false);
        };

        if record.is_expired(Utc::now()) {
            // Left as-is: expiry is computed at read time, never stored.
            tracing::warn!(email = %email, "passcode expired");
            return Ok(false);
        }

        record.verified = true;
        self.records.save(record).await?;
        tracing::info!(email = %email, "passcode verified");
        Ok(true)
    }

    async fn consume_for_reset(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<OtpRecord>, OtpError> {
        // Latest expiry stands in for "most recently issued" since every
        // record gets the same TTL. Only the verified flag is required;
        // a verified code from an abandoned attempt still qualifies as long
        // as no later code superseded it (known looseness, kept).
        let latest = self.records.find_latest_by_email(email).await?;
        Ok(latest.filter(|record| record.verified))
    }
}
