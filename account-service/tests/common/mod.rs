use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::sync::Mutex;

use account_service::domain::identity::errors::AuthError;
use account_service::domain::identity::models::EmailAddress;
use account_service::domain::identity::models::Identity;
use account_service::domain::identity::ports::CredentialStore;
use account_service::domain::identity::service::AuthService;
use account_service::domain::otp::errors::NotificationError;
use account_service::domain::otp::errors::OtpError;
use account_service::domain::otp::models::DispatchMode;
use account_service::domain::otp::models::OtpCode;
use account_service::domain::otp::models::OtpRecord;
use account_service::domain::otp::ports::NotificationGateway;
use account_service::domain::otp::ports::OtpStore;
use account_service::domain::otp::service::OtpService;
use async_trait::async_trait;
use chrono::Duration;
use chrono::Utc;

/// Fully wired service stack backed by in-memory adapters.
pub struct TestHarness {
    pub auth: Arc<AuthService<InMemoryCredentialStore, InMemoryOtpStore, RecordingGateway>>,
    pub otp: Arc<OtpService<InMemoryCredentialStore, InMemoryOtpStore, RecordingGateway>>,
    pub tokens: Arc<auth::TokenService>,
    pub credentials: Arc<InMemoryCredentialStore>,
    pub otp_store: Arc<InMemoryOtpStore>,
    pub gateway: Arc<RecordingGateway>,
}

impl TestHarness {
    pub fn new(dispatch: DispatchMode) -> Self {
        let tokens = Arc::new(auth::TokenService::new(
            b"test-secret-key-for-jwt-signing-at-least-32-bytes",
            Duration::hours(1),
        ));
        let credentials = Arc::new(InMemoryCredentialStore::default());
        let otp_store = Arc::new(InMemoryOtpStore::default());
        let gateway = Arc::new(RecordingGateway::default());

        let otp = Arc::new(OtpService::new(
            Arc::clone(&credentials),
            Arc::clone(&otp_store),
            Arc::clone(&gateway),
            dispatch,
        ));
        let auth = Arc::new(AuthService::new(
            Arc::clone(&credentials),
            Arc::clone(&otp),
            Arc::clone(&tokens),
        ));

        Self {
            auth,
            otp,
            tokens,
            credentials,
            otp_store,
            gateway,
        }
    }
}

pub fn email(address: &str) -> EmailAddress {
    EmailAddress::new(address.to_string()).expect("invalid test email")
}

/// In-memory credential store with the same upsert-by-id and unique-email
/// semantics as the Postgres adapter.
#[derive(Default)]
pub struct InMemoryCredentialStore {
    identities: Mutex<Vec<Identity>>,
}

#[async_trait]
impl CredentialStore for InMemoryCredentialStore {
    async fn exists_by_email(&self, email: &EmailAddress) -> Result<bool, AuthError> {
        let identities = self.identities.lock().unwrap();
        Ok(identities.iter().any(|i| i.email == *email))
    }

    async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<Identity>, AuthError> {
        let identities = self.identities.lock().unwrap();
        Ok(identities.iter().find(|i| i.email == *email).cloned())
    }

    async fn save(&self, identity: Identity) -> Result<Identity, AuthError> {
        let mut identities = self.identities.lock().unwrap();
        if let Some(existing) = identities.iter_mut().find(|i| i.id == identity.id) {
            *existing = identity.clone();
            return Ok(identity);
        }
        if identities.iter().any(|i| i.email == identity.email) {
            return Err(AuthError::AlreadyRegistered(identity.email.to_string()));
        }
        identities.push(identity.clone());
        Ok(identity)
    }
}

/// In-memory passcode store mirroring the Postgres adapter's queries.
#[derive(Default)]
pub struct InMemoryOtpStore {
    records: Mutex<Vec<OtpRecord>>,
}

impl InMemoryOtpStore {
    pub fn records_for(&self, email: &EmailAddress) -> Vec<OtpRecord> {
        let records = self.records.lock().unwrap();
        records
            .iter()
            .filter(|r| r.email == *email)
            .cloned()
            .collect()
    }

    /// Force every record for the email into the past.
    pub fn expire_all(&self, email: &EmailAddress) {
        let mut records = self.records.lock().unwrap();
        for record in records.iter_mut().filter(|r| r.email == *email) {
            record.expires_at = Utc::now() - Duration::minutes(1);
        }
    }
}

#[async_trait]
impl OtpStore for InMemoryOtpStore {
    async fn save(&self, record: OtpRecord) -> Result<OtpRecord, OtpError> {
        let mut records = self.records.lock().unwrap();
        if let Some(existing) = records.iter_mut().find(|r| r.id == record.id) {
            *existing = record.clone();
        } else {
            records.push(record.clone());
        }
        Ok(record)
    }

    async fn find_by_email_and_code_unverified(
        &self,
        email: &EmailAddress,
        code: &OtpCode,
    ) -> Result<Option<OtpRecord>, OtpError> {
        let records = self.records.lock().unwrap();
        Ok(records
            .iter()
            .find(|r| r.email == *email && r.code == *code && !r.verified)
            .cloned())
    }

    async fn find_latest_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<OtpRecord>, OtpError> {
        let records = self.records.lock().unwrap();
        Ok(records
            .iter()
            .filter(|r| r.email == *email)
            .max_by_key(|r| r.expires_at)
            .cloned())
    }
}

#[derive(Debug, Clone)]
pub struct SentMail {
    pub to: String,
    pub subject: String,
    pub body: String,
}

/// Gateway that captures outgoing mail; flip `set_failing` to simulate an
/// unreachable transport.
#[derive(Default)]
pub struct RecordingGateway {
    sent: Mutex<Vec<SentMail>>,
    failing: AtomicBool,
}

impl RecordingGateway {
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn sent(&self) -> Vec<SentMail> {
        self.sent.lock().unwrap().clone()
    }

    /// The passcode carried by the most recent mail to this address.
    pub fn last_code_for(&self, email: &EmailAddress) -> Option<OtpCode> {
        let sent = self.sent.lock().unwrap();
        let mail = sent.iter().rev().find(|m| m.to == email.as_str())?;
        let digits: String = mail
            .body
            .chars()
            .skip_while(|c| !c.is_ascii_digit())
            .take(6)
            .collect();
        OtpCode::new(digits).ok()
    }
}

#[async_trait]
impl NotificationGateway for RecordingGateway {
    async fn send(
        &self,
        to: &EmailAddress,
        subject: &str,
        body: &str,
    ) -> Result<(), NotificationError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(NotificationError::SendFailed(
                "smtp unreachable".to_string(),
            ));
        }
        self.sent.lock().unwrap().push(SentMail {
            to: to.to_string(),
            subject: subject.to_string(),
            body: body.to_string(),
        });
        Ok(())
    }
}
