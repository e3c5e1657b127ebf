//! Stateless session credentials.
//!
//! A credential is an HS256 JWT binding `{account id, role}` with a fixed
//! short expiry. Verification is pure: signature plus expiry, no storage.

use chrono::Utc;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::Role;

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("Session expired")]
    Expired,

    #[error("Invalid session token")]
    Invalid,
}

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: i32,
    role: Role,
    exp: i64,
}

/// The identity resolved from a verified session credential.
#[derive(Debug, Clone, Copy)]
pub struct AuthContext {
    pub account_id: i32,
    pub role: Role,
}

#[derive(Clone)]
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl_minutes: i64,
}

impl TokenService {
    #[must_use]
    pub fn new(secret: &str, ttl_minutes: i64) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl_minutes,
        }
    }

    pub fn issue(&self, account_id: i32, role: Role) -> Result<String, TokenError> {
        let claims = Claims {
            sub: account_id,
            role,
            exp: (Utc::now() + chrono::Duration::minutes(self.ttl_minutes)).timestamp(),
        };

        encode(&Header::default(), &claims, &self.encoding).map_err(|_| TokenError::Invalid)
    }

    pub fn verify(&self, token: &str) -> Result<AuthContext, TokenError> {
        let mut validation = Validation::default();
        validation.leeway = 0;

        let data = decode::<Claims>(token, &self.decoding, &validation).map_err(|e| {
            match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Invalid,
            }
        })?;

        Ok(AuthContext {
            account_id: data.claims.sub,
            role: data.claims.role,
        })
    }

    /// Cookie lifetime matching the token expiry, in seconds.
    #[must_use]
    pub const fn ttl_seconds(&self) -> i64 {
        self.ttl_minutes * 60
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issue_and_verify_round_trip() {
        let service = TokenService::new("test-secret", 15);
        let token = service.issue(7, Role::Admin).unwrap();

        let ctx = service.verify(&token).unwrap();
        assert_eq!(ctx.account_id, 7);
        assert_eq!(ctx.role, Role::Admin);
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let service = TokenService::new("test-secret", -5);
        let token = service.issue(1, Role::Admin).unwrap();

        assert!(matches!(service.verify(&token), Err(TokenError::Expired)));
    }

    #[test]
    fn test_wrong_secret_is_rejected() {
        let issuer = TokenService::new("secret-a", 15);
        let verifier = TokenService::new("secret-b", 15);
        let token = issuer.issue(1, Role::User).unwrap();

        assert!(matches!(verifier.verify(&token), Err(TokenError::Invalid)));
    }

    #[test]
    fn test_garbage_token_is_rejected() {
        let service = TokenService::new("test-secret", 15);
        assert!(matches!(
            service.verify("not.a.token"),
            Err(TokenError::Invalid)
        ));
    }
}
