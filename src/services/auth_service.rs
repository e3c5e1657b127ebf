use async_trait::async_trait;
use thiserror::Error;

use crate::models::Account;

#[derive(Debug, Error)]
pub enum AuthError {
    /// Unknown username and wrong password collapse into this one variant so
    /// the response does not reveal which accounts exist.
    #[error("Identifiants invalides")]
    InvalidCredentials,

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Outcome of a successful login: the signed session token plus the
/// authenticated account for the response body.
#[derive(Debug, Clone)]
pub struct LoginResult {
    pub token: String,
    pub account: Account,
}

#[async_trait]
pub trait AuthService: Send + Sync {
    async fn login(&self, username: &str, password: &str) -> Result<LoginResult, AuthError>;
}
