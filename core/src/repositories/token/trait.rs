//! Store trait defining the interface for refresh token persistence.

use async_trait::async_trait;

use crate::domain::entities::token::RefreshTokenRecord;
use crate::errors::TokenResult;

/// Persistence contract for refresh-token records.
///
/// Implementations store only the keyed hash of a token secret, never
/// the plaintext. Mutation is append-only (new record) or a one-way
/// flag flip (revoke); historical fields are never rewritten, so the
/// table doubles as an audit trail for reuse incidents.
#[async_trait]
pub trait RefreshTokenStore: Send + Sync {
    /// Insert a new active record.
    ///
    /// # Returns
    /// * `Ok(RefreshTokenRecord)` - The persisted record
    /// * `Err(TokenError::ServiceUnavailable)` - Insert failed
    ///   (including a duplicate token hash)
    async fn create(&self, record: RefreshTokenRecord) -> TokenResult<RefreshTokenRecord>;

    /// Find a record by hash if it exists, is not revoked, and has not
    /// expired. This is the only lookup that may authorize a refresh.
    async fn find_valid(&self, token_hash: &str) -> TokenResult<Option<RefreshTokenRecord>>;

    /// Find a record by hash regardless of state.
    ///
    /// Used only for reuse detection and forensics, never to authorize
    /// a refresh.
    async fn find_any(&self, token_hash: &str) -> TokenResult<Option<RefreshTokenRecord>>;

    /// Most recent active record matching the same user and device
    /// context. Used only for disambiguating a benign concurrent-refresh
    /// race from token theft.
    async fn find_latest_active_for_context(
        &self,
        user_id: i64,
        user_agent: &str,
        ip: &str,
    ) -> TokenResult<Option<RefreshTokenRecord>>;

    /// Atomically flag a record revoked, stamping `revoked_at` on the
    /// first call only.
    ///
    /// This is a compare-and-swap on the `revoked` flag: of any number
    /// of concurrent callers, exactly one observes `Ok(true)`. An
    /// already-revoked or missing record yields `Ok(false)` without
    /// error.
    async fn revoke(&self, token_hash: &str) -> TokenResult<bool>;

    /// Flag every active record for the user as revoked.
    ///
    /// # Returns
    /// * `Ok(usize)` - Number of records revoked
    async fn revoke_all_for_user(&self, user_id: i64) -> TokenResult<usize>;

    /// Delete records whose `expires_at` has passed.
    ///
    /// Retention housekeeping only; the protocol never depends on
    /// deletion because expired records are already inert. Revoked
    /// records are kept until they expire so the audit trail of a
    /// reuse incident survives.
    async fn delete_expired(&self) -> TokenResult<usize>;
}
