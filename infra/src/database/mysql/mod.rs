//! MySQL repository implementations

pub mod token_store;

pub use token_store::MySqlRefreshTokenStore;
