//! Credential and token primitives
//!
//! Reusable authentication infrastructure for services:
//! - Password hashing and verification (Argon2id)
//! - Signed bearer token issuance and verification (HS256)
//!
//! The signing key and token lifetime are injected once at construction and
//! never mutated afterwards; services pass the handlers explicitly instead of
//! reaching for ambient global state.
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::new();
//! let digest = hasher.hash("my_password").unwrap();
//! assert!(hasher.verify("my_password", &digest));
//! assert!(!hasher.verify("not_my_password", &digest));
//! ```
//!
//! ## Bearer Tokens
//! ```
//! use auth::{ClaimSet, TokenService};
//! use chrono::Duration;
//!
//! let tokens = TokenService::new(b"secret_key_at_least_32_bytes_long!", Duration::hours(10));
//! let token = tokens.issue(&ClaimSet::for_subject("alice@example.com")).unwrap();
//!
//! let claims = tokens.verify(&token).expect("token should be valid");
//! assert_eq!(claims.sub, "alice@example.com");
//! assert_eq!(tokens.extract_subject(&token).unwrap(), "alice@example.com");
//! ```

pub mod password;
pub mod token;

// Re-export commonly used items
pub use password::PasswordError;
pub use password::PasswordHasher;
pub use token::ClaimSet;
pub use token::TokenClaims;
pub use token::TokenError;
pub use token::TokenService;
