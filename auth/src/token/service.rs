use chrono::Duration;
use chrono::Utc;
use jsonwebtoken::decode;
use jsonwebtoken::encode;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::Algorithm;
use jsonwebtoken::DecodingKey;
use jsonwebtoken::EncodingKey;
use jsonwebtoken::Header;
use jsonwebtoken::Validation;

use super::claims::ClaimSet;
use super::claims::TokenClaims;
use super::errors::TokenError;

/// Issues and verifies signed, time-bounded bearer tokens.
///
/// The signing key and token lifetime are fixed at construction. Tokens are
/// self-contained (HS256 over the serialized claims), so verification needs
/// no shared session store; the trade-off is that issued tokens cannot be
/// revoked before they expire.
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    algorithm: Algorithm,
    ttl: Duration,
}

impl TokenService {
    /// Create a token service from the shared signing secret and token TTL.
    ///
    /// # Security Notes
    /// - The secret should be at least 256 bits (32 bytes) for HS256
    /// - Store secrets in environment variables or secure vaults, never in code
    pub fn new(secret: &[u8], ttl: Duration) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            algorithm: Algorithm::HS256,
            ttl,
        }
    }

    /// Issue a compact signed token for the given claim set.
    ///
    /// Sets `iat` to now and `exp` to now + TTL. Optional claims that are
    /// absent or empty are left out of the token entirely.
    ///
    /// # Errors
    /// * `EncodingFailed` - Token serialization or signing failed
    pub fn issue(&self, claims: &ClaimSet) -> Result<String, TokenError> {
        let now = Utc::now();
        let claims = TokenClaims {
            sub: claims.subject.clone(),
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
            full_name: non_empty(claims.full_name.as_deref()),
            user_id: non_empty(claims.user_id.as_deref()),
            experience: non_empty(claims.experience.as_deref()),
            role: non_empty(claims.role.as_deref()),
            organization: non_empty(claims.organization.as_deref()),
        };

        let header = Header::new(self.algorithm);
        let token = encode(&header, &claims, &self.encoding_key)
            .map_err(|e| TokenError::EncodingFailed(e.to_string()))?;

        tracing::debug!(subject = %claims.sub, "issued bearer token");
        Ok(token)
    }

    /// Verify a token and return its claims, or `None` if it is invalid.
    ///
    /// Safe by default: a tampered signature, malformed structure, wrong
    /// algorithm, or elapsed expiry all collapse to `None` for the caller.
    /// Each failure class is logged distinctly.
    pub fn verify(&self, token: &str) -> Option<TokenClaims> {
        match self.decode(token) {
            Ok(claims) => Some(claims),
            Err(TokenError::Expired) => {
                tracing::warn!("bearer token is expired");
                None
            }
            Err(TokenError::SignatureMismatch) => {
                tracing::error!("bearer token signature does not match");
                None
            }
            Err(TokenError::UnsupportedAlgorithm) => {
                tracing::error!("bearer token algorithm is not supported");
                None
            }
            Err(e) => {
                tracing::error!(error = %e, "bearer token is malformed");
                None
            }
        }
    }

    /// Extract the subject claim from a signature-valid token.
    ///
    /// Intended for use after [`TokenService::verify`] has accepted the
    /// token; a failure here signals a contract violation upstream, so the
    /// error is propagated rather than swallowed.
    ///
    /// # Errors
    /// * `Expired` / `SignatureMismatch` / `UnsupportedAlgorithm` /
    ///   `Malformed` - Token could not be decoded
    pub fn extract_subject(&self, token: &str) -> Result<String, TokenError> {
        let claims = self.decode(token).map_err(|e| {
            tracing::error!(error = %e, "failed to extract subject from token");
            e
        })?;

        Ok(claims.sub)
    }

    fn decode(&self, token: &str) -> Result<TokenClaims, TokenError> {
        let mut validation = Validation::new(self.algorithm);
        validation.leeway = 0;

        let claims = decode::<TokenClaims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                ErrorKind::InvalidSignature => TokenError::SignatureMismatch,
                ErrorKind::InvalidAlgorithm => TokenError::UnsupportedAlgorithm,
                _ => TokenError::Malformed(e.to_string()),
            })?;

        // A token exactly at its expiry timestamp is already invalid.
        if claims.exp <= Utc::now().timestamp() {
            return Err(TokenError::Expired);
        }

        Ok(claims)
    }
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .filter(|v| !v.is_empty())
        .map(|v| v.to_string())
}
