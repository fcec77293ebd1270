use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;

use crate::domain::identity::errors::AuthError;
use crate::domain::identity::models::EmailAddress;
use crate::domain::identity::models::Identity;
use crate::domain::identity::models::IdentityId;
use crate::domain::identity::models::LoginOutcome;
use crate::domain::identity::models::RegisterCommand;
use crate::domain::identity::models::ResetPasswordCommand;
use crate::domain::identity::models::UpdateProfileCommand;
use crate::domain::identity::ports::AuthServicePort;
use crate::domain::identity::ports::CredentialStore;
use crate::domain::otp::ports::NotificationGateway;
use crate::domain::otp::ports::OtpServicePort;
use crate::domain::otp::ports::OtpStore;
use crate::domain::otp::service::OtpService;

/// Auth orchestrator: composes the credential store, password hasher,
/// token service, and passcode manager into the user-facing flows.
pub struct AuthService<CS, OS, NG>
where
    CS: CredentialStore,
    OS: OtpStore,
    NG: NotificationGateway,
{
    credentials: Arc<CS>,
    otp: Arc<OtpService<CS, OS, NG>>,
    tokens: Arc<auth::TokenService>,
    password_hasher: auth::PasswordHasher,
}

impl<CS, OS, NG> AuthService<CS, OS, NG>
where
    CS: CredentialStore,
    OS: OtpStore,
    NG: NotificationGateway,
{
    /// Create a new auth service with injected dependencies.
    pub fn new(
        credentials: Arc<CS>,
        otp: Arc<OtpService<CS, OS, NG>>,
        tokens: Arc<auth::TokenService>,
    ) -> Self {
        Self {
            credentials,
            otp,
            tokens,
            password_hasher: auth::PasswordHasher::new(),
        }
    }
}

#[async_trait]
impl<CS, OS, NG> AuthServicePort for AuthService<CS, OS, NG>
where
    CS: CredentialStore,
    OS: OtpStore,
    NG: NotificationGateway,
{
    async fn register(&self, command: RegisterCommand) -> Result<Identity, AuthError> {
        tracing::info!(email = %command.email, "attempting to register user");

        if self.credentials.exists_by_email(&command.email).await? {
            tracing::warn!(email = %command.email, "user already registered");
            return Err(AuthError::AlreadyRegistered(command.email.to_string()));
        }

        if command.password != command.confirm_password {
            tracing::warn!(email = %command.email, "password mismatch on registration");
            return Err(AuthError::PasswordMismatch);
        }

        let password_hash = self.password_hasher.hash(&command.password)?;
        let identity = Identity {
            id: IdentityId::new(),
            email: command.email,
            password_hash,
            full_name: command.full_name,
            organization: command.organization,
            role: command.role,
            experience: command.experience,
            created_at: Utc::now(),
        };

        let identity = self.credentials.save(identity).await?;
        tracing::info!(email = %identity.email, "user registered successfully");
        Ok(identity)
    }

    async fn login(
        &self,
        email: &EmailAddress,
        password: &str,
    ) -> Result<LoginOutcome, AuthError> {
        tracing::info!(email = %email, "authenticating user");

        let identity = self
            .credentials
            .find_by_email(email)
            .await?
            .ok_or_else(|| {
                tracing::warn!(email = %email, "login for unregistered email");
                AuthError::NotRegistered(email.to_string())
            })?;

        if !self
            .password_hasher
            .verify(password, &identity.password_hash)
        {
            tracing::warn!(email = %email, "wrong password");
            return Err(AuthError::WrongPassword);
        }

        let token = self.tokens.issue(&identity.claim_set())?;
        tracing::info!(email = %email, "user authenticated successfully");
        Ok(LoginOutcome { identity, token })
    }

    async fn reset_password(&self, command: ResetPasswordCommand) -> Result<(), AuthError> {
        tracing::info!(email = %command.email, "attempting password reset");

        let authorized = self.otp.consume_for_reset(&command.email).await?;
        if authorized.is_none() {
            tracing::warn!(email = %command.email, "no verified passcode for reset");
            return Err(AuthError::OtpNotVerified);
        }

        if command.new_password != command.confirm_password {
            tracing::warn!(email = %command.email, "password mismatch on reset");
            return Err(AuthError::PasswordMismatch);
        }

        let mut identity = self
            .credentials
            .find_by_email(&command.email)
            .await?
            .ok_or_else(|| AuthError::NotRegistered(command.email.to_string()))?;

        identity.password_hash = self.password_hasher.hash(&command.new_password)?;
        self.credentials.save(identity).await?;

        // The consumed passcode record stays verified; it is not invalidated
        // here (known gap, kept from the original flow).
        tracing::info!(email = %command.email, "password reset successfully");
        Ok(())
    }

    async fn update_profile(&self, command: UpdateProfileCommand) -> Result<Identity, AuthError> {
        tracing::info!(email = %command.email, "updating profile");

        let mut identity = self
            .credentials
            .find_by_email(&command.email)
            .await?
            .ok_or_else(|| AuthError::NotRegistered(command.email.to_string()))?;

        identity.full_name = command.full_name;
        identity.organization = command.organization;
        identity.role = command.role;
        identity.experience = command.experience;

        let identity = self.credentials.save(identity).await?;
        tracing::info!(email = %identity.email, "profile updated");
        Ok(identity)
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use chrono::Duration;
    use mockall::mock;

    use super::*;
    use crate::domain::otp::errors::NotificationError;
    use crate::domain::otp::errors::OtpError;
    use crate::domain::otp::models::DispatchMode;
    use crate::domain::otp::models::OtpCode;
    use crate::domain::otp::models::OtpRecord;

    mock! {
        pub TestCredentialStore {}

        #[async_trait]
        impl CredentialStore for TestCredentialStore {
            async fn exists_by_email(&self, email: &EmailAddress) -> Result<bool, AuthError>;
            async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<Identity>, AuthError>;
            async fn save(&self, identity: Identity) -> Result<Identity, AuthError>;
        }
    }

    mock! {
        pub TestOtpStore {}

        #[async_trait]
        impl OtpStore for TestOtpStore {
            async fn save(&self, record: OtpRecord) -> Result<OtpRecord, OtpError>;
            async fn find_by_email_and_code_unverified(
                &self,
                email: &EmailAddress,
                code: &OtpCode,
            ) -> Result<Option<OtpRecord>, OtpError>;
            async fn find_latest_by_email(
                &self,
                email: &EmailAddress,
            ) -> Result<Option<OtpRecord>, OtpError>;
        }
    }

    mock! {
        pub TestGateway {}

        #[async_trait]
        impl NotificationGateway for TestGateway {
            async fn send(
                &self,
                to: &EmailAddress,
                subject: &str,
                body: &str,
            ) -> Result<(), NotificationError>;
        }
    }

    fn email() -> EmailAddress {
        EmailAddress::new("alice@example.com".to_string()).unwrap()
    }

    fn register_command() -> RegisterCommand {
        RegisterCommand {
            email: email(),
            password: "pass_word!".to_string(),
            confirm_password: "pass_word!".to_string(),
            full_name: Some("Alice Doe".to_string()),
            organization: None,
            role: Some("Engineer".to_string()),
            experience: None,
        }
    }

    fn token_service() -> Arc<auth::TokenService> {
        Arc::new(auth::TokenService::new(
            b"test_secret_key_at_least_32_bytes!",
            Duration::hours(10),
        ))
    }

    fn auth_service(
        credentials: MockTestCredentialStore,
        records: MockTestOtpStore,
    ) -> AuthService<MockTestCredentialStore, MockTestOtpStore, MockTestGateway> {
        let credentials = Arc::new(credentials);
        let otp = Arc::new(OtpService::new(
            Arc::clone(&credentials),
            Arc::new(records),
            Arc::new(MockTestGateway::new()),
            DispatchMode::Sync,
        ));
        AuthService::new(credentials, otp, token_service())
    }

    fn existing_identity(password: &str) -> Identity {
        let hasher = auth::PasswordHasher::new();
        Identity {
            id: IdentityId::new(),
            email: email(),
            password_hash: hasher.hash(password).unwrap(),
            full_name: Some("Alice Doe".to_string()),
            organization: None,
            role: None,
            experience: None,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_register_success_hashes_password() {
        let mut credentials = MockTestCredentialStore::new();

        credentials
            .expect_exists_by_email()
            .times(1)
            .returning(|_| Ok(false));
        credentials
            .expect_save()
            .withf(|identity| {
                identity.email.as_str() == "alice@example.com"
                    && identity.password_hash.starts_with("$argon2")
            })
            .times(1)
            .returning(Ok);

        let service = auth_service(credentials, MockTestOtpStore::new());
        let identity = service.register(register_command()).await.unwrap();

        assert_eq!(identity.full_name.as_deref(), Some("Alice Doe"));
        assert!(identity.password_hash.starts_with("$argon2"));
    }

    #[tokio::test]
    async fn test_register_duplicate_email() {
        let mut credentials = MockTestCredentialStore::new();

        credentials
            .expect_exists_by_email()
            .times(1)
            .returning(|_| Ok(true));
        credentials.expect_save().times(0);

        let service = auth_service(credentials, MockTestOtpStore::new());
        let result = service.register(register_command()).await;

        assert!(matches!(result, Err(AuthError::AlreadyRegistered(_))));
    }

    #[tokio::test]
    async fn test_register_password_mismatch() {
        let mut credentials = MockTestCredentialStore::new();

        credentials
            .expect_exists_by_email()
            .times(1)
            .returning(|_| Ok(false));
        credentials.expect_save().times(0);

        let service = auth_service(credentials, MockTestOtpStore::new());
        let command = RegisterCommand {
            confirm_password: "different".to_string(),
            ..register_command()
        };
        let result = service.register(command).await;

        assert!(matches!(result, Err(AuthError::PasswordMismatch)));
    }

    #[tokio::test]
    async fn test_login_unregistered_email() {
        let mut credentials = MockTestCredentialStore::new();

        credentials
            .expect_find_by_email()
            .times(1)
            .returning(|_| Ok(None));

        let service = auth_service(credentials, MockTestOtpStore::new());
        let result = service.login(&email(), "pass_word!").await;

        assert!(matches!(result, Err(AuthError::NotRegistered(_))));
    }

    #[tokio::test]
    async fn test_login_wrong_password() {
        let mut credentials = MockTestCredentialStore::new();

        credentials
            .expect_find_by_email()
            .times(1)
            .returning(|_| Ok(Some(existing_identity("pass_word!"))));

        let service = auth_service(credentials, MockTestOtpStore::new());
        let result = service.login(&email(), "wrong_password").await;

        assert!(matches!(result, Err(AuthError::WrongPassword)));
    }

    #[tokio::test]
    async fn test_login_issues_token_with_subject() {
        let mut credentials = MockTestCredentialStore::new();

        credentials
            .expect_find_by_email()
            .times(1)
            .returning(|_| Ok(Some(existing_identity("pass_word!"))));

        let tokens = token_service();
        let credentials = Arc::new(credentials);
        let otp = Arc::new(OtpService::new(
            Arc::clone(&credentials),
            Arc::new(MockTestOtpStore::new()),
            Arc::new(MockTestGateway::new()),
            DispatchMode::Sync,
        ));
        let service = AuthService::new(credentials, otp, Arc::clone(&tokens));

        let outcome = service.login(&email(), "pass_word!").await.unwrap();

        assert!(!outcome.token.is_empty());
        assert_eq!(
            tokens.extract_subject(&outcome.token).unwrap(),
            "alice@example.com"
        );
    }

    #[tokio::test]
    async fn test_reset_requires_verified_passcode() {
        let credentials = MockTestCredentialStore::new();
        let mut records = MockTestOtpStore::new();

        records
            .expect_find_latest_by_email()
            .times(1)
            .returning(|_| Ok(None));

        let service = auth_service(credentials, records);
        let command = ResetPasswordCommand {
            email: email(),
            new_password: "new_password".to_string(),
            confirm_password: "new_password".to_string(),
        };
        let result = service.reset_password(command).await;

        assert!(matches!(result, Err(AuthError::OtpNotVerified)));
    }

    #[tokio::test]
    async fn test_reset_password_mismatch() {
        let credentials = MockTestCredentialStore::new();
        let mut records = MockTestOtpStore::new();

        records
            .expect_find_latest_by_email()
            .times(1)
            .returning(|email| {
                let mut record = OtpRecord::issue(email.clone(), OtpCode::generate());
                record.verified = true;
                Ok(Some(record))
            });

        let service = auth_service(credentials, records);
        let command = ResetPasswordCommand {
            email: email(),
            new_password: "new_password".to_string(),
            confirm_password: "other_password".to_string(),
        };
        let result = service.reset_password(command).await;

        assert!(matches!(result, Err(AuthError::PasswordMismatch)));
    }

    #[tokio::test]
    async fn test_reset_rehashes_and_saves() {
        let mut credentials = MockTestCredentialStore::new();
        let mut records = MockTestOtpStore::new();

        records
            .expect_find_latest_by_email()
            .times(1)
            .returning(|email| {
                let mut record = OtpRecord::issue(email.clone(), OtpCode::generate());
                record.verified = true;
                Ok(Some(record))
            });
        credentials
            .expect_find_by_email()
            .times(1)
            .returning(|_| Ok(Some(existing_identity("old_password"))));
        credentials
            .expect_save()
            .withf(|identity| {
                auth::PasswordHasher::new().verify("new_password", &identity.password_hash)
            })
            .times(1)
            .returning(Ok);

        let service = auth_service(credentials, records);
        let command = ResetPasswordCommand {
            email: email(),
            new_password: "new_password".to_string(),
            confirm_password: "new_password".to_string(),
        };

        assert!(service.reset_password(command).await.is_ok());
    }

    #[tokio::test]
    async fn test_update_profile_unknown_email() {
        let mut credentials = MockTestCredentialStore::new();

        credentials
            .expect_find_by_email()
            .times(1)
            .returning(|_| Ok(None));

        let service = auth_service(credentials, MockTestOtpStore::new());
        let command = UpdateProfileCommand {
            email: email(),
            full_name: Some("Alice D.".to_string()),
            organization: Some("Acme".to_string()),
            role: None,
            experience: None,
        };
        let result = service.update_profile(command).await;

        assert!(matches!(result, Err(AuthError::NotRegistered(_))));
    }

    #[tokio::test]
    async fn test_update_profile_overwrites_fields() {
        let mut credentials = MockTestCredentialStore::new();

        credentials
            .expect_find_by_email()
            .times(1)
            .returning(|_| Ok(Some(existing_identity("pass_word!"))));
        credentials
            .expect_save()
            .withf(|identity| {
                identity.full_name.as_deref() == Some("Alice D.")
                    && identity.organization.as_deref() == Some("Acme")
                    && identity.role.is_none()
            })
            .times(1)
            .returning(Ok);

        let service = auth_service(credentials, MockTestOtpStore::new());
        let command = UpdateProfileCommand {
            email: email(),
            full_name: Some("Alice D.".to_string()),
            organization: Some("Acme".to_string()),
            role: None,
            experience: None,
        };

        let updated = service.update_profile(command).await.unwrap();
        assert_eq!(updated.organization.as_deref(), Some("Acme"));
    }
}
