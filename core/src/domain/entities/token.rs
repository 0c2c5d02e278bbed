//! Token entities for the session lifecycle.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// JWT issuer
pub const JWT_ISSUER: &str = "tokenguard";

/// JWT audience
pub const JWT_AUDIENCE: &str = "tokenguard-api";

/// Claims structure for the access-token JWT payload.
///
/// Access tokens are stateless: the claims are never persisted and are
/// verified purely by recomputing the signature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessClaims {
    /// Subject (user ID)
    pub sub: String,

    /// Issued at timestamp
    pub iat: i64,

    /// Expiration timestamp
    pub exp: i64,

    /// Not before timestamp
    pub nbf: i64,

    /// Issuer
    pub iss: String,

    /// Audience
    pub aud: String,

    /// JWT ID (unique identifier for the token)
    pub jti: String,
}

impl AccessClaims {
    /// Creates new claims for an access token expiring `ttl_seconds` from now.
    pub fn new(user_id: i64, ttl_seconds: i64) -> Self {
        let now = Utc::now();
        let expiry = now + Duration::seconds(ttl_seconds);

        Self {
            sub: user_id.to_string(),
            iat: now.timestamp(),
            exp: expiry.timestamp(),
            nbf: now.timestamp(),
            iss: JWT_ISSUER.to_string(),
            aud: JWT_AUDIENCE.to_string(),
            jti: Uuid::new_v4().to_string(),
        }
    }

    /// Checks if the claims have expired.
    pub fn is_expired(&self) -> bool {
        let now = Utc::now().timestamp();
        now >= self.exp
    }

    /// Gets the user ID from the claims.
    pub fn user_id(&self) -> Result<i64, std::num::ParseIntError> {
        self.sub.parse()
    }
}

/// Refresh token record persisted in the store.
///
/// Only the keyed hash of the opaque secret is ever stored; the
/// plaintext is surfaced to the caller exactly once at issuance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshTokenRecord {
    /// Unique identifier for the record
    pub id: Uuid,

    /// User ID this token belongs to
    pub user_id: i64,

    /// Keyed-hash digest of the token secret (unique)
    pub token_hash: String,

    /// User-Agent reported at issuance (may be empty)
    pub user_agent: String,

    /// Client IP reported at issuance (may be empty)
    pub ip: String,

    /// Timestamp when the record was created
    pub created_at: DateTime<Utc>,

    /// Timestamp when the token expires
    pub expires_at: DateTime<Utc>,

    /// Whether the token has been revoked (one-way flip)
    pub revoked: bool,

    /// Timestamp of the first revocation, if any
    pub revoked_at: Option<DateTime<Utc>>,
}

impl RefreshTokenRecord {
    /// Creates a new active record expiring `ttl_seconds` from now.
    pub fn new(
        user_id: i64,
        token_hash: String,
        user_agent: String,
        ip: String,
        ttl_seconds: i64,
    ) -> Self {
        let now = Utc::now();

        Self {
            id: Uuid::new_v4(),
            user_id,
            token_hash,
            user_agent,
            ip,
            created_at: now,
            expires_at: now + Duration::seconds(ttl_seconds),
            revoked: false,
            revoked_at: None,
        }
    }

    /// Checks if the record has expired.
    pub fn is_expired(&self) -> bool {
        Utc::now() > self.expires_at
    }

    /// Checks if the record is active (not revoked and not expired).
    ///
    /// Active is the only state from which a legitimate refresh may
    /// succeed.
    pub fn is_active(&self) -> bool {
        !self.revoked && !self.is_expired()
    }

    /// Revokes the record, stamping `revoked_at` on the first call only.
    pub fn revoke(&mut self) {
        if !self.revoked {
            self.revoked = true;
            self.revoked_at = Some(Utc::now());
        }
    }
}

/// Token pair returned to the caller on issuance or rotation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
    /// Signed JWT access token
    pub access_token: String,

    /// Opaque refresh-token secret (plaintext, returned exactly once)
    pub refresh_token: String,

    /// Access token expiry time in seconds
    pub access_expires_in: i64,

    /// Refresh token expiry time in seconds
    pub refresh_expires_in: i64,
}

impl TokenPair {
    /// Creates a new token pair with the configured expiry times.
    pub fn new(
        access_token: String,
        refresh_token: String,
        access_expires_in: i64,
        refresh_expires_in: i64,
    ) -> Self {
        Self {
            access_token,
            refresh_token,
            access_expires_in,
            refresh_expires_in,
        }
    }
}
