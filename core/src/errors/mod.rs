//! Protocol-level error types for the token lifecycle.
//!
//! The variants carry protocol semantics only; mapping to transport
//! status codes is the gateway's concern.

use thiserror::Error;

/// Token lifecycle errors.
///
/// Every refresh-rejection path surfaces as the single
/// `InvalidRefreshToken` variant regardless of internal cause, so the
/// response never reveals whether a token was unknown, expired, or
/// caught by reuse detection.
#[derive(Error, Debug)]
pub enum TokenError {
    /// Access token signature or format verification failed.
    #[error("invalid access token")]
    InvalidAccessToken,

    /// Access token expiry has passed.
    #[error("expired access token")]
    ExpiredAccessToken,

    /// Refresh token was unknown, expired, or flagged by reuse detection.
    #[error("invalid refresh token")]
    InvalidRefreshToken,

    /// Storage was unreachable; fatal for the request, never retried here.
    #[error("service unavailable: {message}")]
    ServiceUnavailable { message: String },
}

impl TokenError {
    /// Wraps a storage fault message.
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::ServiceUnavailable {
            message: message.into(),
        }
    }
}

pub type TokenResult<T> = Result<T, TokenError>;
