use async_trait::async_trait;
use thiserror::Error;

use crate::models::{Account, AccountInput};

#[derive(Debug, Error)]
pub enum AccountError {
    #[error("{0}")]
    Validation(String),

    #[error("Ce nom d'utilisateur est déjà pris")]
    Conflict,

    #[error("Compte introuvable")]
    NotFound(i32),

    #[error("{0}")]
    Forbidden(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<anyhow::Error> for AccountError {
    fn from(e: anyhow::Error) -> Self {
        Self::Database(e.to_string())
    }
}

#[async_trait]
pub trait AccountService: Send + Sync {
    async fn list(&self) -> Result<Vec<Account>, AccountError>;

    async fn create(&self, input: AccountInput) -> Result<Account, AccountError>;

    /// Updates an account. A missing or empty password keeps the stored hash.
    async fn update(&self, id: i32, input: AccountInput) -> Result<Account, AccountError>;

    /// Deletes an account. The principal administrator and the caller's own
    /// account are protected.
    async fn delete(&self, id: i32, caller_id: i32) -> Result<(), AccountError>;
}
