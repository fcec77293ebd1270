use serde::Deserialize;
use serde::Serialize;

/// Claims carried by an issued bearer token.
///
/// Optional profile claims are omitted from the serialized token entirely
/// when absent; a missing claim and an empty claim are the same thing on the
/// wire (field-presence contract, not nulls or empty strings).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TokenClaims {
    /// Subject: the identity's email address
    pub sub: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub experience: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub organization: Option<String>,
}

/// Identity facts to bind into a token, before timestamps are applied.
///
/// [`crate::TokenService::issue`] sets `iat`/`exp` and drops optional fields
/// that are empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClaimSet {
    pub subject: String,
    pub full_name: Option<String>,
    pub user_id: Option<String>,
    pub experience: Option<String>,
    pub role: Option<String>,
    pub organization: Option<String>,
}

impl ClaimSet {
    /// Claim set with only the subject filled in.
    pub fn for_subject(subject: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_for_subject() {
        let claims = ClaimSet::for_subject("alice@example.com");
        assert_eq!(claims.subject, "alice@example.com");
        assert!(claims.full_name.is_none());
        assert!(claims.role.is_none());
    }

    #[test]
    fn test_absent_claims_are_omitted_from_wire_format() {
        let claims = TokenClaims {
            sub: "alice@example.com".to_string(),
            iat: 1_700_000_000,
            exp: 1_700_003_600,
            full_name: Some("Alice".to_string()),
            user_id: None,
            experience: None,
            role: None,
            organization: None,
        };

        let json = serde_json::to_string(&claims).unwrap();
        assert!(json.contains("\"fullName\":\"Alice\""));
        assert!(!json.contains("userId"));
        assert!(!json.contains("role"));
        assert!(!json.contains("organization"));
    }
}
