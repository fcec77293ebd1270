use std::fmt;
use std::str::FromStr;

use chrono::DateTime;
use chrono::Utc;
use uuid::Uuid;

use crate::domain::identity::errors::EmailError;
use crate::domain::identity::errors::IdentityIdError;

/// Identity aggregate entity.
///
/// Exactly one live identity per email address; the password hash is an
/// opaque PHC digest, never the plaintext. Profile fields are optional free
/// text carried into issued tokens.
#[derive(Debug, Clone)]
pub struct Identity {
    pub id: IdentityId,
    pub email: EmailAddress,
    pub password_hash: String,
    pub full_name: Option<String>,
    pub organization: Option<String>,
    pub role: Option<String>,
    pub experience: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Identity {
    /// Facts to bind into a bearer token for this identity.
    pub fn claim_set(&self) -> auth::ClaimSet {
        auth::ClaimSet {
            subject: self.email.to_string(),
            full_name: self.full_name.clone(),
            user_id: Some(self.id.to_string()),
            experience: self.experience.clone(),
            role: self.role.clone(),
            organization: self.organization.clone(),
        }
    }
}

/// Identity unique identifier type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IdentityId(pub Uuid);

impl IdentityId {
    /// Generate a new random identity ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse an identity ID from string.
    ///
    /// # Errors
    /// * `InvalidFormat` - String is not a valid UUID
    pub fn from_string(s: &str) -> Result<Self, IdentityIdError> {
        Uuid::parse_str(s)
            .map(IdentityId)
            .map_err(|e| IdentityIdError::InvalidFormat(e.to_string()))
    }
}

impl Default for IdentityId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for IdentityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Email address type
///
/// Validates email format using RFC 5322 compliant parser.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Create a new validated email address.
    ///
    /// # Errors
    /// * `InvalidFormat` - Email does not conform to RFC 5322
    pub fn new(email: String) -> Result<Self, EmailError> {
        email_address::EmailAddress::from_str(&email)
            .map(|_| EmailAddress(email))
            .map_err(|e| EmailError::InvalidFormat(e.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Command to register a new identity.
///
/// The password arrives in plaintext alongside its confirmation; the
/// orchestrator checks the two match and hashes before anything is stored.
#[derive(Debug)]
pub struct RegisterCommand {
    pub email: EmailAddress,
    pub password: String,
    pub confirm_password: String,
    pub full_name: Option<String>,
    pub organization: Option<String>,
    pub role: Option<String>,
    pub experience: Option<String>,
}

/// Command to reset a password after passcode verification.
#[derive(Debug)]
pub struct ResetPasswordCommand {
    pub email: EmailAddress,
    pub new_password: String,
    pub confirm_password: String,
}

/// Command to overwrite an identity's profile fields.
#[derive(Debug)]
pub struct UpdateProfileCommand {
    pub email: EmailAddress,
    pub full_name: Option<String>,
    pub organization: Option<String>,
    pub role: Option<String>,
    pub experience: Option<String>,
}

/// Successful login: the identity plus its freshly issued bearer token.
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    pub identity: Identity,
    pub token: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_address_validation() {
        assert!(EmailAddress::new("alice@example.com".to_string()).is_ok());
        assert!(EmailAddress::new("not-an-email".to_string()).is_err());
        assert!(EmailAddress::new(String::new()).is_err());
    }

    #[test]
    fn test_identity_id_round_trip() {
        let id = IdentityId::new();
        let parsed = IdentityId::from_string(&id.to_string()).unwrap();
        assert_eq!(id, parsed);
        assert!(IdentityId::from_string("not-a-uuid").is_err());
    }

    #[test]
    fn test_claim_set_carries_profile_fields() {
        let identity = Identity {
            id: IdentityId::new(),
            email: EmailAddress::new("alice@example.com".to_string()).unwrap(),
            password_hash: "$argon2id$test".to_string(),
            full_name: Some("Alice Doe".to_string()),
            organization: None,
            role: Some("Engineer".to_string()),
            experience: None,
            created_at: Utc::now(),
        };

        let claims = identity.claim_set();
        assert_eq!(claims.subject, "alice@example.com");
        assert_eq!(claims.full_name.as_deref(), Some("Alice Doe"));
        assert_eq!(claims.role.as_deref(), Some("Engineer"));
        assert_eq!(claims.user_id, Some(identity.id.to_string()));
        assert!(claims.organization.is_none());
    }
}
