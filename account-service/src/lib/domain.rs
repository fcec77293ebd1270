pub mod identity;
pub mod otp;
