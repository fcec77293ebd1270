pub mod claims;
pub mod errors;
pub mod service;

pub use claims::ClaimSet;
pub use claims::TokenClaims;
pub use errors::TokenError;
pub use service::TokenService;
