use std::fmt;

use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use rand::Rng;
use serde::Deserialize;
use uuid::Uuid;

use crate::domain::identity::models::EmailAddress;
use crate::domain::otp::errors::OtpCodeError;

/// Fixed passcode validity window.
pub const OTP_TTL_MINUTES: i64 = 5;

/// One-time passcode record tied to an email address.
///
/// The `verified` flag only ever transitions false -> true. "Expired" is an
/// overlay predicate computed at read time, never written back. Multiple
/// outstanding records per email are permitted; lookups disambiguate by
/// query, not by a cardinality guarantee.
#[derive(Debug, Clone)]
pub struct OtpRecord {
    pub id: OtpId,
    pub email: EmailAddress,
    pub code: OtpCode,
    pub expires_at: DateTime<Utc>,
    pub verified: bool,
}

impl OtpRecord {
    /// Fresh unverified record expiring [`OTP_TTL_MINUTES`] from now.
    pub fn issue(email: EmailAddress, code: OtpCode) -> Self {
        Self {
            id: OtpId::new(),
            email,
            code,
            expires_at: Utc::now() + Duration::minutes(OTP_TTL_MINUTES),
            verified: false,
        }
    }

    /// A record exactly at its expiry timestamp is no longer usable.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}

/// Passcode record unique identifier type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OtpId(pub Uuid);

impl OtpId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for OtpId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for OtpId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Zero-padded six-digit numeric passcode in [000000, 999999].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OtpCode(String);

impl OtpCode {
    /// Draw a fresh code with uniform randomness, independent of any
    /// outstanding code for the same email.
    pub fn generate() -> Self {
        let value = rand::thread_rng().gen_range(0..1_000_000);
        Self(format!("{:06}", value))
    }

    /// Validate an externally supplied code string.
    ///
    /// # Errors
    /// * `InvalidFormat` - Not exactly six ASCII digits
    pub fn new(code: String) -> Result<Self, OtpCodeError> {
        if code.len() == 6 && code.chars().all(|c| c.is_ascii_digit()) {
            Ok(Self(code))
        } else {
            Err(OtpCodeError::InvalidFormat)
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OtpCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// How passcode delivery relates to the caller's request.
///
/// `Sync` awaits the send and propagates its failure to the caller;
/// `Deferred` detaches the send onto the runtime and only logs failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DispatchMode {
    Sync,
    Deferred,
}
