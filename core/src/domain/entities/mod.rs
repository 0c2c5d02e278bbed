//! Domain entities representing the token lifecycle objects.

pub mod token;

// Re-export commonly used types
pub use token::{AccessClaims, RefreshTokenRecord, TokenPair, JWT_AUDIENCE, JWT_ISSUER};
