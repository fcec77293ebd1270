use async_trait::async_trait;

use crate::domain::identity::models::EmailAddress;
use crate::domain::otp::errors::NotificationError;
use crate::domain::otp::errors::OtpError;
use crate::domain::otp::models::OtpCode;
use crate::domain::otp::models::OtpRecord;

/// Port for the passcode lifecycle operations.
#[async_trait]
pub trait OtpServicePort: Send + Sync + 'static {
    /// Generate, persist, and dispatch a fresh passcode for a registered
    /// email.
    ///
    /// # Errors
    /// * `NotRegistered` - No identity for this email; nothing is persisted
    /// * `DeliveryFailed` - Gateway send failed (sync dispatch only); the
    ///   record stays persisted
    /// * `DatabaseError` - Store operation failed
    async fn request(&self, email: &EmailAddress) -> Result<(), OtpError>;

    /// Mark a matching unverified, unexpired passcode as verified.
    ///
    /// Returns false for an unknown, already verified, or expired code.
    ///
    /// # Errors
    /// * `DatabaseError` - Store operation failed
    async fn verify(&self, email: &EmailAddress, code: &OtpCode) -> Result<bool, OtpError>;

    /// The latest-expiry passcode record for the email, if it is verified.
    ///
    /// # Errors
    /// * `DatabaseError` - Store operation failed
    async fn consume_for_reset(&self, email: &EmailAddress)
        -> Result<Option<OtpRecord>, OtpError>;
}

/// Persistence operations for passcode records.
#[async_trait]
pub trait OtpStore: Send + Sync + 'static {
    /// Upsert a passcode record by id.
    ///
    /// # Errors
    /// * `DatabaseError` - Store operation failed
    async fn save(&self, record: OtpRecord) -> Result<OtpRecord, OtpError>;

    /// An unverified record matching both email and code, if any.
    ///
    /// When duplicates match, which one is returned is store-defined.
    ///
    /// # Errors
    /// * `DatabaseError` - Store operation failed
    async fn find_by_email_and_code_unverified(
        &self,
        email: &EmailAddress,
        code: &OtpCode,
    ) -> Result<Option<OtpRecord>, OtpError>;

    /// The record with the latest expiry for this email, if any.
    ///
    /// # Errors
    /// * `DatabaseError` - Store operation failed
    async fn find_latest_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<OtpRecord>, OtpError>;
}

/// Out-of-band delivery of passcodes to the user.
#[async_trait]
pub trait NotificationGateway: Send + Sync + 'static {
    /// Deliver a plain-text message to the destination address.
    ///
    /// # Errors
    /// * `InvalidMessage` - Message could not be built
    /// * `SendFailed` - Transport-level delivery failure
    async fn send(
        &self,
        to: &EmailAddress,
        subject: &str,
        body: &str,
    ) -> Result<(), NotificationError>;
}
