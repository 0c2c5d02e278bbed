pub mod token;

pub use token::{MockRefreshTokenStore, RefreshTokenStore};
