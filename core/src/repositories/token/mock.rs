//! In-memory implementation of RefreshTokenStore for testing.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::entities::token::RefreshTokenRecord;
use crate::errors::{TokenError, TokenResult};

use super::r#trait::RefreshTokenStore;

/// In-memory refresh-token store keyed by token hash.
#[derive(Clone, Default)]
pub struct MockRefreshTokenStore {
    records: Arc<RwLock<HashMap<String, RefreshTokenRecord>>>,
}

impl MockRefreshTokenStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrites a stored record in place, for tests that need to age
    /// or mutate one directly.
    #[cfg(test)]
    pub(crate) async fn replace_for_test(&self, record: RefreshTokenRecord) {
        let mut records = self.records.write().await;
        records.insert(record.token_hash.clone(), record);
    }

    /// Snapshot of every record for a user, regardless of state.
    pub async fn records_for_user(&self, user_id: i64) -> Vec<RefreshTokenRecord> {
        let records = self.records.read().await;
        records
            .values()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect()
    }
}

#[async_trait]
impl RefreshTokenStore for MockRefreshTokenStore {
    async fn create(&self, record: RefreshTokenRecord) -> TokenResult<RefreshTokenRecord> {
        let mut records = self.records.write().await;

        if records.contains_key(&record.token_hash) {
            return Err(TokenError::unavailable("duplicate token hash"));
        }

        records.insert(record.token_hash.clone(), record.clone());
        Ok(record)
    }

    async fn find_valid(&self, token_hash: &str) -> TokenResult<Option<RefreshTokenRecord>> {
        let records = self.records.read().await;
        Ok(records
            .get(token_hash)
            .filter(|r| r.is_active())
            .cloned())
    }

    async fn find_any(&self, token_hash: &str) -> TokenResult<Option<RefreshTokenRecord>> {
        let records = self.records.read().await;
        Ok(records.get(token_hash).cloned())
    }

    async fn find_latest_active_for_context(
        &self,
        user_id: i64,
        user_agent: &str,
        ip: &str,
    ) -> TokenResult<Option<RefreshTokenRecord>> {
        let records = self.records.read().await;
        Ok(records
            .values()
            .filter(|r| {
                r.user_id == user_id
                    && r.user_agent == user_agent
                    && r.ip == ip
                    && r.is_active()
            })
            .max_by_key(|r| r.created_at)
            .cloned())
    }

    async fn revoke(&self, token_hash: &str) -> TokenResult<bool> {
        let mut records = self.records.write().await;

        match records.get_mut(token_hash) {
            Some(record) if !record.revoked => {
                record.revoke();
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn revoke_all_for_user(&self, user_id: i64) -> TokenResult<usize> {
        let mut records = self.records.write().await;
        let mut count = 0;

        for record in records.values_mut() {
            if record.user_id == user_id && !record.revoked {
                record.revoke();
                count += 1;
            }
        }

        Ok(count)
    }

    async fn delete_expired(&self) -> TokenResult<usize> {
        let mut records = self.records.write().await;
        let initial_count = records.len();

        records.retain(|_, record| !record.is_expired());

        Ok(initial_count - records.len())
    }
}
