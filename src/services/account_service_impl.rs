use async_trait::async_trait;
use tracing::info;

use crate::config::SecurityConfig;
use crate::db::{Store, hash_password};
use crate::models::{Account, AccountInput, Role};
use crate::services::account_service::{AccountError, AccountService};

pub struct SeaOrmAccountService {
    store: Store,
    security: SecurityConfig,
    principal_account_id: i32,
}

impl SeaOrmAccountService {
    #[must_use]
    pub const fn new(store: Store, security: SecurityConfig, principal_account_id: i32) -> Self {
        Self {
            store,
            security,
            principal_account_id,
        }
    }

    fn validate_common(input: &AccountInput) -> Result<Role, AccountError> {
        if input.name.trim().is_empty() {
            return Err(AccountError::Validation("Le nom est requis".to_string()));
        }
        if input.username.trim().is_empty() {
            return Err(AccountError::Validation(
                "Le nom d'utilisateur est requis".to_string(),
            ));
        }
        input
            .role
            .parse()
            .map_err(|_| AccountError::Validation("Rôle invalide".to_string()))
    }

    async fn hash(&self, password: String) -> Result<String, AccountError> {
        let security = self.security.clone();
        tokio::task::spawn_blocking(move || hash_password(&password, &security))
            .await
            .map_err(|e| AccountError::Internal(e.to_string()))?
            .map_err(|e| AccountError::Internal(e.to_string()))
    }
}

#[async_trait]
impl AccountService for SeaOrmAccountService {
    async fn list(&self) -> Result<Vec<Account>, AccountError> {
        Ok(self.store.list_accounts().await?)
    }

    async fn create(&self, input: AccountInput) -> Result<Account, AccountError> {
        let role = Self::validate_common(&input)?;
        let name = input.name.trim().to_string();
        let username = input.username.trim().to_string();

        let Some(password) = input.password.filter(|p| !p.is_empty()) else {
            return Err(AccountError::Validation(
                "Le mot de passe est requis".to_string(),
            ));
        };

        if self.store.find_account_by_username(&username).await?.is_some() {
            return Err(AccountError::Conflict);
        }

        let hash = self.hash(password).await?;
        Ok(self
            .store
            .insert_account(&name, &username, &hash, role.as_str())
            .await?)
    }

    async fn update(&self, id: i32, input: AccountInput) -> Result<Account, AccountError> {
        let role = Self::validate_common(&input)?;
        let name = input.name.trim().to_string();
        let username = input.username.trim().to_string();

        if let Some(existing) = self.store.find_account_by_username(&username).await? {
            if existing.id != id {
                return Err(AccountError::Conflict);
            }
        }

        // An empty password field from the form means "keep the current one".
        let new_hash = match input.password.filter(|p| !p.is_empty()) {
            Some(password) => Some(self.hash(password).await?),
            None => None,
        };

        match self
            .store
            .update_account(id, &name, &username, role.as_str(), new_hash.as_deref())
            .await?
        {
            Some(account) => Ok(account),
            None => Err(AccountError::NotFound(id)),
        }
    }

    async fn delete(&self, id: i32, caller_id: i32) -> Result<(), AccountError> {
        if id == self.principal_account_id {
            return Err(AccountError::Forbidden(
                "Impossible de supprimer le compte administrateur principal".to_string(),
            ));
        }
        if id == caller_id {
            return Err(AccountError::Forbidden(
                "Impossible de supprimer votre propre compte".to_string(),
            ));
        }

        if !self.store.delete_account(id).await? {
            return Err(AccountError::NotFound(id));
        }
        info!("Deleted account {}", id);
        Ok(())
    }
}
