//! Unit tests for the access-token signer

use chrono::{Duration, Utc};

use crate::domain::entities::token::AccessClaims;
use crate::errors::TokenError;
use crate::services::token::AccessTokenSigner;

#[test]
fn test_issue_and_verify() {
    let signer = AccessTokenSigner::new("unit-test-secret");

    let token = signer.issue(42, 900).unwrap();
    let claims = signer.verify(&token).unwrap();

    assert_eq!(claims.user_id().unwrap(), 42);
    assert_eq!(claims.exp - claims.iat, 900);
}

#[test]
fn test_verify_garbage_token() {
    let signer = AccessTokenSigner::new("unit-test-secret");

    let result = signer.verify("not-a-jwt");
    assert!(matches!(result, Err(TokenError::InvalidAccessToken)));
}

#[test]
fn test_verify_rejects_wrong_secret() {
    let signer = AccessTokenSigner::new("secret-a");
    let other = AccessTokenSigner::new("secret-b");

    let token = signer.issue(1, 900).unwrap();
    let result = other.verify(&token);

    assert!(matches!(result, Err(TokenError::InvalidAccessToken)));
}

#[test]
fn test_verify_rejects_tampered_token() {
    let signer = AccessTokenSigner::new("unit-test-secret");

    let mut token = signer.issue(1, 900).unwrap();
    token.pop();
    token.push('x');

    assert!(signer.verify(&token).is_err());
}

#[test]
fn test_verify_expired_token() {
    let signer = AccessTokenSigner::new("unit-test-secret");

    let mut claims = AccessClaims::new(1, 900);
    claims.exp = (Utc::now() - Duration::hours(1)).timestamp();
    // Keep nbf/iat in the past so only the expiry trips.
    claims.iat = claims.exp - 60;
    claims.nbf = claims.iat;

    let token = signer.encode(&claims).unwrap();
    let result = signer.verify(&token);

    assert!(matches!(result, Err(TokenError::ExpiredAccessToken)));
}
