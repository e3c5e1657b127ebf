use anyhow::Result;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Statement};
use std::path::Path;
use std::time::Duration;
use tracing::info;

use crate::models::{Account, Article, ArticleInput};

pub mod migrator;
pub mod repositories;

pub use repositories::account::{hash_password, verify_password_hash};

#[derive(Clone)]
pub struct Store {
    pub conn: DatabaseConnection,
}

impl Store {
    pub async fn new(db_url: &str) -> Result<Self> {
        Self::with_pool_options(db_url, 5, 1).await
    }

    pub async fn with_pool_options(
        db_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self> {
        use sea_orm_migration::MigratorTrait;

        // An in-memory sqlite database exists per connection; the pool must
        // stay at a single connection or each checkout sees an empty schema.
        let is_memory = db_url.contains(":memory:");
        let (max_connections, min_connections) = if is_memory {
            (1, 1)
        } else {
            (max_connections, min_connections)
        };

        if !is_memory {
            let path_str = db_url.trim_start_matches("sqlite:");
            if let Some(parent) = Path::new(path_str).parent() {
                tokio::fs::create_dir_all(parent).await.ok();
            }
            if !Path::new(path_str).exists() {
                std::fs::File::create(path_str)?;
            }
        }

        let mut opt = ConnectOptions::new(db_url.to_string());
        opt.max_connections(max_connections)
            .min_connections(min_connections)
            .connect_timeout(Duration::from_secs(10))
            .acquire_timeout(Duration::from_secs(10))
            .idle_timeout(Duration::from_secs(300))
            .max_lifetime(Duration::from_secs(600))
            .sqlx_logging(false);

        let conn = Database::connect(opt).await?;

        migrator::Migrator::up(&conn, None).await?;

        info!(
            "Database connected & migrations applied (pool: {}-{})",
            min_connections, max_connections
        );

        Ok(Self { conn })
    }

    pub async fn ping(&self) -> Result<()> {
        let backend = self.conn.get_database_backend();
        self.conn
            .query_one(Statement::from_string(backend, "SELECT 1".to_string()))
            .await?;
        Ok(())
    }

    fn article_repo(&self) -> repositories::article::ArticleRepository {
        repositories::article::ArticleRepository::new(self.conn.clone())
    }

    fn account_repo(&self) -> repositories::account::AccountRepository {
        repositories::account::AccountRepository::new(self.conn.clone())
    }

    pub async fn list_articles(&self) -> Result<Vec<Article>> {
        self.article_repo().list().await
    }

    pub async fn get_article(&self, id: i32) -> Result<Option<Article>> {
        self.article_repo().get(id).await
    }

    pub async fn find_article_by_code(&self, code: &str) -> Result<Option<Article>> {
        self.article_repo().find_by_code_ci(code).await
    }

    pub async fn search_articles(&self, term: &str) -> Result<Vec<Article>> {
        self.article_repo().search(term).await
    }

    pub async fn insert_article(&self, input: &ArticleInput) -> Result<Article> {
        self.article_repo().insert(input).await
    }

    pub async fn update_article(&self, id: i32, input: &ArticleInput) -> Result<Option<Article>> {
        self.article_repo().update(id, input).await
    }

    pub async fn delete_article(&self, id: i32) -> Result<bool> {
        self.article_repo().delete(id).await
    }

    pub async fn list_accounts(&self) -> Result<Vec<Account>> {
        self.account_repo().list().await
    }

    pub async fn get_account(&self, id: i32) -> Result<Option<Account>> {
        self.account_repo().get(id).await
    }

    pub async fn get_account_by_username_with_hash(
        &self,
        username: &str,
    ) -> Result<Option<(Account, String)>> {
        self.account_repo().get_by_username_with_hash(username).await
    }

    pub async fn find_account_by_username(&self, username: &str) -> Result<Option<Account>> {
        self.account_repo().find_by_username(username).await
    }

    pub async fn insert_account(
        &self,
        name: &str,
        username: &str,
        password_hash: &str,
        role: &str,
    ) -> Result<Account> {
        self.account_repo()
            .insert(name, username, password_hash, role)
            .await
    }

    pub async fn update_account(
        &self,
        id: i32,
        name: &str,
        username: &str,
        role: &str,
        password_hash: Option<&str>,
    ) -> Result<Option<Account>> {
        self.account_repo()
            .update(id, name, username, role, password_hash)
            .await
    }

    pub async fn delete_account(&self, id: i32) -> Result<bool> {
        self.account_repo().delete(id).await
    }
}
