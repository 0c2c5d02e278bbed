//! Periodic cleanup of expired refresh-token records
//!
//! Expired records are logically inert, so deletion is retention
//! housekeeping rather than a correctness requirement.

use std::sync::Arc;
use tracing::{error, info, warn};

use crate::errors::TokenResult;
use crate::repositories::RefreshTokenStore;

/// Configuration for the cleanup service
#[derive(Debug, Clone)]
pub struct TokenCleanupConfig {
    /// How often to run cleanup (in seconds)
    pub interval_seconds: u64,
    /// Whether to enable automatic cleanup
    pub enabled: bool,
}

impl Default for TokenCleanupConfig {
    fn default() -> Self {
        Self {
            interval_seconds: 3600,
            enabled: true,
        }
    }
}

/// Result of a cleanup cycle
#[derive(Debug, Default)]
pub struct CleanupResult {
    /// Number of expired records deleted
    pub expired_records_deleted: usize,
}

/// Deletes expired refresh-token records on a fixed interval.
pub struct TokenCleanupService<S: RefreshTokenStore + 'static> {
    store: Arc<S>,
    config: TokenCleanupConfig,
}

impl<S: RefreshTokenStore> TokenCleanupService<S> {
    /// Create a new cleanup service
    pub fn new(store: Arc<S>, config: TokenCleanupConfig) -> Self {
        Self { store, config }
    }

    /// Run a single cleanup cycle
    pub async fn run_cleanup(&self) -> TokenResult<CleanupResult> {
        if !self.config.enabled {
            return Ok(CleanupResult::default());
        }

        let deleted = self.store.delete_expired().await?;
        if deleted > 0 {
            info!(deleted, "deleted expired refresh token records");
        }

        Ok(CleanupResult {
            expired_records_deleted: deleted,
        })
    }

    /// Start the cleanup service as a background tokio task.
    pub fn start_background_task(self: Arc<Self>) {
        if !self.config.enabled {
            warn!("token cleanup service is disabled");
            return;
        }

        let interval = std::time::Duration::from_secs(self.config.interval_seconds);

        tokio::spawn(async move {
            info!(
                interval_seconds = self.config.interval_seconds,
                "token cleanup service started"
            );

            let mut interval_timer = tokio::time::interval(interval);

            loop {
                interval_timer.tick().await;

                if let Err(e) = self.run_cleanup().await {
                    error!("token cleanup cycle failed: {}", e);
                }
            }
        });
    }
}
