//! Token lifecycle module
//!
//! This module handles all token-related operations including:
//! - JWT access token signing and verification
//! - Opaque refresh token issuance and single-use rotation
//! - Reuse detection with a bounded grace window for benign races
//! - Mass session revocation on theft signals
//! - Background cleanup of expired records

mod cleanup;
mod config;
mod service;
mod signer;

#[cfg(test)]
mod tests;

pub use cleanup::{CleanupResult, TokenCleanupConfig, TokenCleanupService};
pub use config::TokenServiceConfig;
pub use service::TokenService;
pub use signer::AccessTokenSigner;
