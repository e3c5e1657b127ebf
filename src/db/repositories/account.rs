use anyhow::{Context, Result};
use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use tracing::info;

use crate::config::SecurityConfig;
use crate::entities::{accounts, prelude::*};
use crate::models::Account;

pub struct AccountRepository {
    conn: DatabaseConnection,
}

impl AccountRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn list(&self) -> Result<Vec<Account>> {
        let rows = Accounts::find()
            .order_by_asc(accounts::Column::Id)
            .all(&self.conn)
            .await
            .context("Failed to list accounts")?;

        Ok(rows.into_iter().map(Account::from).collect())
    }

    pub async fn get(&self, id: i32) -> Result<Option<Account>> {
        let row = Accounts::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query account by id")?;

        Ok(row.map(Account::from))
    }

    /// Username lookup keeping the stored hash, for credential verification.
    pub async fn get_by_username_with_hash(
        &self,
        username: &str,
    ) -> Result<Option<(Account, String)>> {
        let row = Accounts::find()
            .filter(accounts::Column::Username.eq(username))
            .one(&self.conn)
            .await
            .context("Failed to query account by username")?;

        Ok(row.map(|model| {
            let hash = model.password_hash.clone();
            (Account::from(model), hash)
        }))
    }

    pub async fn find_by_username(&self, username: &str) -> Result<Option<Account>> {
        let row = Accounts::find()
            .filter(accounts::Column::Username.eq(username))
            .one(&self.conn)
            .await
            .context("Failed to query account by username")?;

        Ok(row.map(Account::from))
    }

    pub async fn insert(
        &self,
        name: &str,
        username: &str,
        password_hash: &str,
        role: &str,
    ) -> Result<Account> {
        let now = chrono::Utc::now().to_rfc3339();

        let active = accounts::ActiveModel {
            name: Set(name.to_string()),
            username: Set(username.to_string()),
            password_hash: Set(password_hash.to_string()),
            role: Set(role.to_string()),
            created_at: Set(now),
            ..Default::default()
        };

        let model = active
            .insert(&self.conn)
            .await
            .context("Failed to insert account")?;

        info!("Created account {} ({})", model.username, model.id);
        Ok(Account::from(model))
    }

    /// Applies the given fields to an existing row. A `None` password hash
    /// leaves the stored hash untouched. Returns `None` for an unknown id.
    pub async fn update(
        &self,
        id: i32,
        name: &str,
        username: &str,
        role: &str,
        password_hash: Option<&str>,
    ) -> Result<Option<Account>> {
        let Some(existing) = Accounts::find_by_id(id).one(&self.conn).await? else {
            return Ok(None);
        };

        let mut active: accounts::ActiveModel = existing.into();
        active.name = Set(name.to_string());
        active.username = Set(username.to_string());
        active.role = Set(role.to_string());
        if let Some(hash) = password_hash {
            active.password_hash = Set(hash.to_string());
        }

        let model = active
            .update(&self.conn)
            .await
            .context("Failed to update account")?;

        Ok(Some(Account::from(model)))
    }

    pub async fn delete(&self, id: i32) -> Result<bool> {
        let result = Accounts::delete_by_id(id)
            .exec(&self.conn)
            .await
            .context("Failed to delete account")?;

        Ok(result.rows_affected > 0)
    }
}

/// Hash a password using Argon2id with the configured params.
pub fn hash_password(password: &str, config: &SecurityConfig) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);

    let params = Params::new(
        config.argon2_memory_cost_kib,
        config.argon2_time_cost,
        config.argon2_parallelism,
        None,
    )
    .map_err(|e| anyhow::anyhow!("Invalid Argon2 params: {e}"))?;
    let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);

    let hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("Failed to hash password: {e}"))?;

    Ok(hash.to_string())
}

/// Verify a password against a stored Argon2 hash. Constant-time at the
/// hash-comparison level per the argon2 crate.
pub fn verify_password_hash(stored_hash: &str, password: &str) -> Result<bool> {
    let parsed_hash = PasswordHash::new(stored_hash)
        .map_err(|e| anyhow::anyhow!("Invalid password hash format: {e}"))?;

    let argon2 = Argon2::default();
    Ok(argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify_round_trip() {
        let config = SecurityConfig {
            argon2_memory_cost_kib: 1024,
            argon2_time_cost: 1,
            argon2_parallelism: 1,
        };
        let hash = hash_password("s3cret", &config).unwrap();
        assert!(verify_password_hash(&hash, "s3cret").unwrap());
        assert!(!verify_password_hash(&hash, "wrong").unwrap());
    }

    #[test]
    fn test_verify_rejects_garbage_hash() {
        assert!(verify_password_hash("not-a-hash", "pw").is_err());
    }
}
