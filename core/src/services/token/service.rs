//! Token lifecycle service implementation

use chrono::{Duration, Utc};
use hmac::{Hmac, Mac};
use rand::distributions::Alphanumeric;
use rand::Rng;
use sha2::Sha256;
use tracing::{debug, warn};

use crate::domain::entities::token::{AccessClaims, RefreshTokenRecord, TokenPair};
use crate::errors::{TokenError, TokenResult};
use crate::repositories::RefreshTokenStore;

use super::config::TokenServiceConfig;
use super::signer::AccessTokenSigner;

type HmacSha256 = Hmac<Sha256>;

/// Length of the opaque refresh-token secret in characters.
const REFRESH_SECRET_LENGTH: usize = 48;

/// Orchestrates issuance, single-use rotation, and reuse detection for
/// session tokens.
///
/// A refresh-token record moves through one-way states: active, then
/// rotated (revoked and superseded), revoked by a mass logout, or
/// simply expired. Rotating on every use bounds a leaked refresh token
/// to a single use; a second presentation of an already-rotated token
/// is a reuse signal, because the legitimate client has rotated it
/// away.
///
/// The grace window exists because duplicate concurrent refresh calls
/// from the same client (tabs, retries) are normal and would otherwise
/// be indistinguishable from theft. Disambiguation looks for a sibling
/// active record in the same device context rather than taking a
/// distributed lock; this is a heuristic, and cannot tell a two-tab
/// race apart from an attacker who also spoofs the device's reported
/// identity strings.
pub struct TokenService<S: RefreshTokenStore> {
    pub(crate) store: S,
    config: TokenServiceConfig,
    signer: AccessTokenSigner,
}

impl<S: RefreshTokenStore> TokenService<S> {
    /// Creates a new token service instance.
    pub fn new(store: S, config: TokenServiceConfig) -> Self {
        let signer = AccessTokenSigner::new(&config.jwt_secret);

        Self {
            store,
            config,
            signer,
        }
    }

    /// Issues a fresh access/refresh pair for a user.
    ///
    /// The refresh-token plaintext in the returned pair is surfaced
    /// exactly once; only its keyed hash is persisted.
    pub async fn issue_tokens(
        &self,
        user_id: i64,
        user_agent: &str,
        ip: &str,
    ) -> TokenResult<TokenPair> {
        let access_token = self.signer.issue(user_id, self.config.access_ttl_seconds)?;

        let secret = self.generate_refresh_secret();
        let record = RefreshTokenRecord::new(
            user_id,
            self.hash_refresh_token(&secret),
            user_agent.to_string(),
            ip.to_string(),
            self.config.refresh_ttl_seconds,
        );
        self.store.create(record).await?;

        debug!(user_id, "issued token pair");

        Ok(TokenPair::new(
            access_token,
            secret,
            self.config.access_ttl_seconds,
            self.config.refresh_ttl_seconds,
        ))
    }

    /// Exchanges a refresh token for a new pair, rotating it.
    ///
    /// The single legitimate path requires winning the compare-and-swap
    /// revoke on an active record, so two concurrent requests presenting
    /// the same token cannot both mint children from it. Every
    /// rejection surfaces as `InvalidRefreshToken` regardless of the
    /// internal cause.
    pub async fn refresh(
        &self,
        refresh_token: &str,
        user_agent: &str,
        ip: &str,
    ) -> TokenResult<TokenPair> {
        let token_hash = self.hash_refresh_token(refresh_token);

        if let Some(record) = self.store.find_valid(&token_hash).await? {
            // Only the caller that wins the CAS rotates; a loser raced a
            // concurrent refresh and falls through to reuse handling.
            if self.store.revoke(&token_hash).await? {
                let user_agent = if user_agent.is_empty() {
                    record.user_agent
                } else {
                    user_agent.to_string()
                };
                let ip = if ip.is_empty() {
                    record.ip
                } else {
                    ip.to_string()
                };

                return self.issue_tokens(record.user_id, &user_agent, &ip).await;
            }
        }

        match self.store.find_any(&token_hash).await? {
            // Never issued, or garbage. No side effect.
            None => Err(TokenError::InvalidRefreshToken),

            // Already rotated or revoked: a reuse signal.
            Some(record) if record.revoked => self.handle_reuse(record, user_agent, ip).await,

            // Expired without ever being revoked.
            Some(_) => Err(TokenError::InvalidRefreshToken),
        }
    }

    /// Disambiguates a benign concurrent-refresh race from theft.
    async fn handle_reuse(
        &self,
        record: RefreshTokenRecord,
        user_agent: &str,
        ip: &str,
    ) -> TokenResult<TokenPair> {
        let grace = self.config.refresh_reuse_grace_seconds;

        if grace > 0 && !user_agent.is_empty() && !ip.is_empty() {
            let sibling = self
                .store
                .find_latest_active_for_context(record.user_id, user_agent, ip)
                .await?;

            if let Some(sibling) = sibling {
                if Utc::now() - sibling.created_at <= Duration::seconds(grace) {
                    debug!(
                        user_id = record.user_id,
                        "revoked refresh token presented within grace window from same \
                         device context, treating as concurrent refresh"
                    );
                    return self.issue_tokens(record.user_id, user_agent, ip).await;
                }
            }
        }

        let sessions_revoked = self.store.revoke_all_for_user(record.user_id).await?;

        warn!(
            user_id = record.user_id,
            token_id = %record.id,
            sessions_revoked,
            "refresh token reuse detected, revoked all sessions for user"
        );

        Err(TokenError::InvalidRefreshToken)
    }

    /// Revokes exactly the presented refresh token (single-session logout).
    ///
    /// # Returns
    /// * `Ok(true)` - This call flipped the record to revoked
    /// * `Ok(false)` - Record was missing or already revoked
    pub async fn revoke(&self, refresh_token: &str) -> TokenResult<bool> {
        let token_hash = self.hash_refresh_token(refresh_token);
        self.store.revoke(&token_hash).await
    }

    /// Revokes every session for a user (credential change, compromise).
    pub async fn revoke_all_sessions(&self, user_id: i64) -> TokenResult<usize> {
        self.store.revoke_all_for_user(user_id).await
    }

    /// Verifies an access token and returns its claims.
    ///
    /// Pure signature recomputation; no store lookup.
    pub fn verify_access_token(&self, token: &str) -> TokenResult<AccessClaims> {
        self.signer.verify(token)
    }

    /// Generates a cryptographically random opaque refresh secret.
    fn generate_refresh_secret(&self) -> String {
        rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(REFRESH_SECRET_LENGTH)
            .map(char::from)
            .collect()
    }

    /// Computes the keyed hash under which a refresh token is stored.
    ///
    /// HMAC-SHA256 under a key distinct from the JWT signing secret,
    /// hex-encoded to a fixed 64 characters.
    pub(crate) fn hash_refresh_token(&self, token: &str) -> String {
        let mut mac = HmacSha256::new_from_slice(self.config.refresh_hash_key.as_bytes())
            .expect("HMAC accepts keys of any length");
        mac.update(token.as_bytes());
        hex::encode(mac.finalize().into_bytes())
    }
}
