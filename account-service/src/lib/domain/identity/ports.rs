use async_trait::async_trait;

use crate::domain::identity::errors::AuthError;
use crate::domain::identity::models::EmailAddress;
use crate::domain::identity::models::Identity;
use crate::domain::identity::models::LoginOutcome;
use crate::domain::identity::models::RegisterCommand;
use crate::domain::identity::models::ResetPasswordCommand;
use crate::domain::identity::models::UpdateProfileCommand;

/// Port for the user-facing credential flows.
#[async_trait]
pub trait AuthServicePort: Send + Sync + 'static {
    /// Register a new identity.
    ///
    /// # Errors
    /// * `AlreadyRegistered` - An identity with this email exists
    /// * `PasswordMismatch` - Password and confirmation differ
    /// * `DatabaseError` - Store operation failed
    async fn register(&self, command: RegisterCommand) -> Result<Identity, AuthError>;

    /// Authenticate an identity and issue a bearer token.
    ///
    /// # Errors
    /// * `NotRegistered` - No identity for this email
    /// * `WrongPassword` - Credential verification failed
    /// * `DatabaseError` - Store operation failed
    async fn login(&self, email: &EmailAddress, password: &str)
        -> Result<LoginOutcome, AuthError>;

    /// Replace the stored password hash after passcode verification.
    ///
    /// # Errors
    /// * `OtpNotVerified` - No verified passcode authorizes this reset
    /// * `PasswordMismatch` - New password and confirmation differ
    /// * `NotRegistered` - No identity for this email
    /// * `DatabaseError` - Store operation failed
    async fn reset_password(&self, command: ResetPasswordCommand) -> Result<(), AuthError>;

    /// Overwrite the identity's profile fields.
    ///
    /// # Errors
    /// * `NotRegistered` - No identity for this email
    /// * `DatabaseError` - Store operation failed
    async fn update_profile(&self, command: UpdateProfileCommand) -> Result<Identity, AuthError>;
}

/// Durable record of identities and their password hashes.
#[async_trait]
pub trait CredentialStore: Send + Sync + 'static {
    /// Whether an identity with this email exists.
    ///
    /// # Errors
    /// * `DatabaseError` - Store operation failed
    async fn exists_by_email(&self, email: &EmailAddress) -> Result<bool, AuthError>;

    /// Retrieve the identity for an email, if any.
    ///
    /// # Errors
    /// * `DatabaseError` - Store operation failed
    async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<Identity>, AuthError>;

    /// Upsert an identity by id.
    ///
    /// # Errors
    /// * `AlreadyRegistered` - Email uniqueness violated on insert
    /// * `DatabaseError` - Store operation failed
    async fn save(&self, identity: Identity) -> Result<Identity, AuthError>;
}
