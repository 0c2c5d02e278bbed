//! Unit tests for the token lifecycle service

use async_trait::async_trait;

use crate::domain::entities::token::RefreshTokenRecord;
use crate::errors::{TokenError, TokenResult};
use crate::repositories::{MockRefreshTokenStore, RefreshTokenStore};
use crate::services::token::{TokenService, TokenServiceConfig};

fn create_test_service() -> (TokenService<MockRefreshTokenStore>, MockRefreshTokenStore) {
    create_test_service_with(TokenServiceConfig::default())
}

fn create_test_service_with(
    config: TokenServiceConfig,
) -> (TokenService<MockRefreshTokenStore>, MockRefreshTokenStore) {
    let store = MockRefreshTokenStore::new();
    (TokenService::new(store.clone(), config), store)
}

#[tokio::test]
async fn test_issue_tokens() {
    let (service, store) = create_test_service();

    let pair = service
        .issue_tokens(42, "ios/1.0", "10.0.0.5")
        .await
        .unwrap();

    assert!(!pair.access_token.is_empty());
    assert!(!pair.refresh_token.is_empty());
    assert_eq!(pair.access_expires_in, 900);
    assert_eq!(pair.refresh_expires_in, 1_209_600);

    // Exactly one record, holding the keyed hash and device context.
    let records = store.records_for_user(42).await;
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].user_agent, "ios/1.0");
    assert_eq!(records[0].ip, "10.0.0.5");
    assert!(records[0].is_active());
}

#[tokio::test]
async fn test_plaintext_secret_is_never_persisted() {
    let (service, store) = create_test_service();

    let pair = service.issue_tokens(1, "", "").await.unwrap();

    let records = store.records_for_user(1).await;
    assert_ne!(records[0].token_hash, pair.refresh_token);
    assert!(!records[0].token_hash.contains(&pair.refresh_token));
    // Fixed-length hex digest.
    assert_eq!(records[0].token_hash.len(), 64);
    assert!(records[0].token_hash.chars().all(|c| c.is_ascii_hexdigit()));
}

#[tokio::test]
async fn test_verify_access_token() {
    let (service, _) = create_test_service();

    let pair = service.issue_tokens(42, "", "").await.unwrap();
    let claims = service.verify_access_token(&pair.access_token).unwrap();

    assert_eq!(claims.user_id().unwrap(), 42);
}

#[tokio::test]
async fn test_verify_invalid_access_token() {
    let (service, _) = create_test_service();

    let result = service.verify_access_token("invalid_token");
    assert!(matches!(result, Err(TokenError::InvalidAccessToken)));
}

#[tokio::test]
async fn test_revoke_single_session() {
    let (service, _) = create_test_service();

    let pair = service.issue_tokens(1, "", "").await.unwrap();

    assert!(service.revoke(&pair.refresh_token).await.unwrap());

    let result = service.refresh(&pair.refresh_token, "", "").await;
    assert!(matches!(result, Err(TokenError::InvalidRefreshToken)));
}

#[tokio::test]
async fn test_revoke_is_idempotent() {
    let (service, store) = create_test_service();

    let pair = service.issue_tokens(1, "", "").await.unwrap();

    assert!(service.revoke(&pair.refresh_token).await.unwrap());
    let first_revoked_at = store.records_for_user(1).await[0].revoked_at;
    assert!(first_revoked_at.is_some());

    // Second call is a no-op, not an error.
    assert!(!service.revoke(&pair.refresh_token).await.unwrap());
    let record = store.records_for_user(1).await.remove(0);
    assert!(record.revoked);
    assert_eq!(record.revoked_at, first_revoked_at);
}

#[tokio::test]
async fn test_revoke_all_sessions() {
    let (service, store) = create_test_service();

    for _ in 0..3 {
        service.issue_tokens(7, "", "").await.unwrap();
    }

    let revoked = service.revoke_all_sessions(7).await.unwrap();
    assert_eq!(revoked, 3);

    assert!(store
        .records_for_user(7)
        .await
        .iter()
        .all(|r| r.revoked));
}

#[tokio::test]
async fn test_refresh_hash_is_deterministic_and_keyed() {
    let (service, _) = create_test_service();

    let hash1 = service.hash_refresh_token("some_secret");
    let hash2 = service.hash_refresh_token("some_secret");
    assert_eq!(hash1, hash2);
    assert_ne!(hash1, service.hash_refresh_token("other_secret"));

    // A different hash key yields a different digest for the same input.
    let other_config = TokenServiceConfig {
        refresh_hash_key: "another-hash-key".to_string(),
        ..TokenServiceConfig::default()
    };
    let (other_service, _) = create_test_service_with(other_config);
    assert_ne!(hash1, other_service.hash_refresh_token("some_secret"));
}

#[tokio::test]
async fn test_cleanup_deletes_expired_records() {
    use crate::services::token::{TokenCleanupConfig, TokenCleanupService};
    use std::sync::Arc;

    let (service, store) = create_test_service();

    let pair = service.issue_tokens(1, "", "").await.unwrap();
    service.issue_tokens(1, "", "").await.unwrap();

    let hash = service.hash_refresh_token(&pair.refresh_token);
    let mut record = store.find_any(&hash).await.unwrap().unwrap();
    record.expires_at = chrono::Utc::now() - chrono::Duration::seconds(1);
    store.replace_for_test(record).await;

    let cleanup = TokenCleanupService::new(Arc::new(store.clone()), TokenCleanupConfig::default());
    let result = cleanup.run_cleanup().await.unwrap();

    assert_eq!(result.expired_records_deleted, 1);
    assert_eq!(store.records_for_user(1).await.len(), 1);
}

#[tokio::test]
async fn test_cleanup_disabled_is_noop() {
    use crate::services::token::{TokenCleanupConfig, TokenCleanupService};
    use std::sync::Arc;

    let (_, store) = create_test_service();
    let config = TokenCleanupConfig {
        enabled: false,
        ..TokenCleanupConfig::default()
    };

    let cleanup = TokenCleanupService::new(Arc::new(store), config);
    let result = cleanup.run_cleanup().await.unwrap();
    assert_eq!(result.expired_records_deleted, 0);
}

/// Store stub whose every operation reports a storage fault.
struct UnavailableStore;

#[async_trait]
impl RefreshTokenStore for UnavailableStore {
    async fn create(&self, _record: RefreshTokenRecord) -> TokenResult<RefreshTokenRecord> {
        Err(TokenError::unavailable("connection refused"))
    }

    async fn find_valid(&self, _token_hash: &str) -> TokenResult<Option<RefreshTokenRecord>> {
        Err(TokenError::unavailable("connection refused"))
    }

    async fn find_any(&self, _token_hash: &str) -> TokenResult<Option<RefreshTokenRecord>> {
        Err(TokenError::unavailable("connection refused"))
    }

    async fn find_latest_active_for_context(
        &self,
        _user_id: i64,
        _user_agent: &str,
        _ip: &str,
    ) -> TokenResult<Option<RefreshTokenRecord>> {
        Err(TokenError::unavailable("connection refused"))
    }

    async fn revoke(&self, _token_hash: &str) -> TokenResult<bool> {
        Err(TokenError::unavailable("connection refused"))
    }

    async fn revoke_all_for_user(&self, _user_id: i64) -> TokenResult<usize> {
        Err(TokenError::unavailable("connection refused"))
    }

    async fn delete_expired(&self) -> TokenResult<usize> {
        Err(TokenError::unavailable("connection refused"))
    }
}

#[tokio::test]
async fn test_storage_fault_surfaces_as_service_unavailable() {
    let service = TokenService::new(UnavailableStore, TokenServiceConfig::default());

    let issue = service.issue_tokens(1, "", "").await;
    assert!(matches!(issue, Err(TokenError::ServiceUnavailable { .. })));

    let refresh = service.refresh("whatever", "", "").await;
    assert!(matches!(
        refresh,
        Err(TokenError::ServiceUnavailable { .. })
    ));
}
