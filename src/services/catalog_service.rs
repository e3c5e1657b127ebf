use async_trait::async_trait;
use thiserror::Error;

use crate::models::{Article, ArticleInput};

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("{0}")]
    Validation(String),

    #[error("Un article avec le code '{0}' existe déjà")]
    Conflict(String),

    #[error("Article introuvable")]
    NotFound(i32),

    #[error("Database error: {0}")]
    Database(String),
}

impl From<anyhow::Error> for CatalogError {
    fn from(e: anyhow::Error) -> Self {
        Self::Database(e.to_string())
    }
}

#[async_trait]
pub trait CatalogService: Send + Sync {
    async fn list(&self) -> Result<Vec<Article>, CatalogError>;

    /// Substring search over code, description and type.
    async fn search(&self, term: &str) -> Result<Vec<Article>, CatalogError>;

    async fn create(&self, input: ArticleInput) -> Result<Article, CatalogError>;

    async fn update(&self, id: i32, input: ArticleInput) -> Result<Article, CatalogError>;

    async fn delete(&self, id: i32) -> Result<(), CatalogError>;
}

/// Field validation shared by create and update. Inputs are expected to be
/// normalized already.
pub(crate) fn validate_article_input(input: &ArticleInput) -> Result<(), CatalogError> {
    if input.code.is_empty() {
        return Err(CatalogError::Validation("Le code est requis".to_string()));
    }
    if input.description.is_empty() {
        return Err(CatalogError::Validation(
            "La description est requise".to_string(),
        ));
    }
    if !input.prix_vente.is_finite() || input.prix_vente < 0.0 {
        return Err(CatalogError::Validation(
            "Le prix de vente doit être un nombre positif".to_string(),
        ));
    }
    if !input.achat_minimum.is_finite() || input.achat_minimum < 0.0 {
        return Err(CatalogError::Validation(
            "L'achat minimum doit être un nombre positif".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_input() -> ArticleInput {
        ArticleInput {
            code: "A1".to_string(),
            description: "desc".to_string(),
            prix_vente: 1.0,
            achat_minimum: 2.0,
            ..Default::default()
        }
    }

    #[test]
    fn test_valid_input_passes() {
        assert!(validate_article_input(&valid_input()).is_ok());
    }

    #[test]
    fn test_empty_code_is_rejected() {
        let input = ArticleInput {
            code: String::new(),
            ..valid_input()
        };
        assert!(matches!(
            validate_article_input(&input),
            Err(CatalogError::Validation(_))
        ));
    }

    #[test]
    fn test_empty_description_is_rejected() {
        let input = ArticleInput {
            description: String::new(),
            ..valid_input()
        };
        assert!(validate_article_input(&input).is_err());
    }

    #[test]
    fn test_negative_price_is_rejected() {
        let input = ArticleInput {
            prix_vente: -0.5,
            ..valid_input()
        };
        assert!(validate_article_input(&input).is_err());
    }

    #[test]
    fn test_nan_minimum_is_rejected() {
        let input = ArticleInput {
            achat_minimum: f64::NAN,
            ..valid_input()
        };
        assert!(validate_article_input(&input).is_err());
    }

    #[test]
    fn test_zero_amounts_are_allowed() {
        let input = ArticleInput {
            prix_vente: 0.0,
            achat_minimum: 0.0,
            ..valid_input()
        };
        assert!(validate_article_input(&input).is_ok());
    }
}
