use async_trait::async_trait;
use tracing::{info, warn};

use crate::db::{Store, verify_password_hash};
use crate::services::auth_service::{AuthError, AuthService, LoginResult};
use crate::services::token::TokenService;

pub struct SeaOrmAuthService {
    store: Store,
    tokens: TokenService,
}

impl SeaOrmAuthService {
    #[must_use]
    pub const fn new(store: Store, tokens: TokenService) -> Self {
        Self { store, tokens }
    }
}

#[async_trait]
impl AuthService for SeaOrmAuthService {
    async fn login(&self, username: &str, password: &str) -> Result<LoginResult, AuthError> {
        let Some((account, stored_hash)) = self
            .store
            .get_account_by_username_with_hash(username)
            .await
            .map_err(|e| AuthError::Database(e.to_string()))?
        else {
            warn!("Login attempt for unknown username '{}'", username);
            return Err(AuthError::InvalidCredentials);
        };

        // Argon2 verification is CPU-bound, keep it off the async workers.
        let password = password.to_string();
        let verified = tokio::task::spawn_blocking(move || {
            verify_password_hash(&stored_hash, &password)
        })
        .await
        .map_err(|e| AuthError::Internal(e.to_string()))?
        .map_err(|e| AuthError::Internal(e.to_string()))?;

        if !verified {
            warn!("Failed login for '{}'", username);
            return Err(AuthError::InvalidCredentials);
        }

        let token = self
            .tokens
            .issue(account.id, account.role)
            .map_err(|e| AuthError::Internal(e.to_string()))?;

        info!("Account '{}' logged in", account.username);
        Ok(LoginResult { token, account })
    }
}
