//! Stateless access-token signing and verification

use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};

use crate::domain::entities::token::{AccessClaims, JWT_AUDIENCE, JWT_ISSUER};
use crate::errors::{TokenError, TokenResult};

/// Signs and verifies short-lived access tokens.
///
/// Purely deterministic given the secret; no store access and no side
/// effects. Verification recomputes the HS256 signature and checks the
/// registered time claims.
pub struct AccessTokenSigner {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl AccessTokenSigner {
    /// Creates a signer bound to the given symmetric secret.
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[JWT_ISSUER]);
        validation.set_audience(&[JWT_AUDIENCE]);
        validation.validate_exp = true;
        validation.validate_nbf = true;

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    /// Issues a signed access token for `user_id` expiring after
    /// `ttl_seconds`.
    pub fn issue(&self, user_id: i64, ttl_seconds: i64) -> TokenResult<String> {
        let claims = AccessClaims::new(user_id, ttl_seconds);
        self.encode(&claims)
    }

    /// Encodes a prepared claim set.
    pub(crate) fn encode(&self, claims: &AccessClaims) -> TokenResult<String> {
        let header = Header::new(Algorithm::HS256);
        encode(&header, claims, &self.encoding_key).map_err(|_| TokenError::InvalidAccessToken)
    }

    /// Verifies a token and returns its claims.
    ///
    /// # Returns
    /// * `Ok(AccessClaims)` - Signature and time claims check out
    /// * `Err(TokenError::ExpiredAccessToken)` - Expiry has passed
    /// * `Err(TokenError::InvalidAccessToken)` - Any other failure
    pub fn verify(&self, token: &str) -> TokenResult<AccessClaims> {
        let token_data = decode::<AccessClaims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| {
                if e.kind() == &jsonwebtoken::errors::ErrorKind::ExpiredSignature {
                    TokenError::ExpiredAccessToken
                } else {
                    TokenError::InvalidAccessToken
                }
            })?;

        Ok(token_data.claims)
    }
}
