//! Database module - MySQL implementations using SQLx

pub mod mysql;

// Re-export commonly used types
pub use mysql::MySqlRefreshTokenStore;
