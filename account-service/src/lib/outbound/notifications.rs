pub mod smtp;

pub use smtp::SmtpNotificationGateway;
