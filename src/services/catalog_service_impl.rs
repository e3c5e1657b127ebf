use async_trait::async_trait;
use tracing::info;

use crate::db::Store;
use crate::models::{Article, ArticleInput};
use crate::services::catalog_service::{CatalogError, CatalogService, validate_article_input};

pub struct SeaOrmCatalogService {
    store: Store,
}

impl SeaOrmCatalogService {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }
}

#[async_trait]
impl CatalogService for SeaOrmCatalogService {
    async fn list(&self) -> Result<Vec<Article>, CatalogError> {
        Ok(self.store.list_articles().await?)
    }

    async fn search(&self, term: &str) -> Result<Vec<Article>, CatalogError> {
        Ok(self.store.search_articles(term).await?)
    }

    async fn create(&self, input: ArticleInput) -> Result<Article, CatalogError> {
        let input = input.normalized();
        validate_article_input(&input)?;

        if let Some(existing) = self.store.find_article_by_code(&input.code).await? {
            return Err(CatalogError::Conflict(existing.code));
        }

        Ok(self.store.insert_article(&input).await?)
    }

    async fn update(&self, id: i32, input: ArticleInput) -> Result<Article, CatalogError> {
        let input = input.normalized();
        validate_article_input(&input)?;

        // Code uniqueness is case-insensitive but an article may keep its own
        // code across an update.
        if let Some(existing) = self.store.find_article_by_code(&input.code).await? {
            if existing.id != id {
                return Err(CatalogError::Conflict(existing.code));
            }
        }

        match self.store.update_article(id, &input).await? {
            Some(article) => Ok(article),
            None => Err(CatalogError::NotFound(id)),
        }
    }

    async fn delete(&self, id: i32) -> Result<(), CatalogError> {
        if !self.store.delete_article(id).await? {
            return Err(CatalogError::NotFound(id));
        }
        info!("Deleted article {}", id);
        Ok(())
    }
}
