//! # TokenGuard Core
//!
//! Core protocol layer for the TokenGuard token lifecycle subsystem.
//! This crate contains the domain entities, the refresh-token store
//! interface, the access-token signer, and the lifecycle service that
//! implements single-use rotation with reuse detection.

pub mod domain;
pub mod errors;
pub mod repositories;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::*;
pub use errors::*;
pub use repositories::*;
pub use services::*;
