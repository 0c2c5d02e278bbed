//! # Infrastructure Layer
//!
//! Concrete persistence for the TokenGuard token lifecycle: a MySQL
//! implementation of the core `RefreshTokenStore` trait using SQLx.
//!
//! ## Features
//!
//! - `mysql`: Enable MySQL database support (default)

// Re-export core types for convenience
pub use tg_core::errors::*;

/// Database module - MySQL implementations using SQLx
#[cfg(feature = "mysql")]
pub mod database;
