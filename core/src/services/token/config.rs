//! Configuration for the token lifecycle service

/// Configuration for the token lifecycle service.
///
/// Injected at construction; there is no process-wide state.
#[derive(Debug, Clone)]
pub struct TokenServiceConfig {
    /// JWT signing secret for access tokens
    pub jwt_secret: String,
    /// Keyed-hash secret for refresh tokens, distinct from `jwt_secret`
    pub refresh_hash_key: String,
    /// Access token lifetime in seconds
    pub access_ttl_seconds: i64,
    /// Refresh token lifetime in seconds
    pub refresh_ttl_seconds: i64,
    /// Reuse grace window in seconds; 0 disables the grace path and
    /// treats every reuse signal as theft
    pub refresh_reuse_grace_seconds: i64,
}

impl Default for TokenServiceConfig {
    fn default() -> Self {
        Self {
            jwt_secret: "development-secret-please-change-in-production".to_string(),
            refresh_hash_key: "development-hash-key-please-change-in-production".to_string(),
            access_ttl_seconds: 900,
            refresh_ttl_seconds: 1_209_600,
            refresh_reuse_grace_seconds: 0,
        }
    }
}
