pub mod identity;
pub mod otp;

pub use identity::PostgresCredentialStore;
pub use otp::PostgresOtpStore;
