use anyhow::{Context, Result};
use sea_orm::sea_query::{Expr, Func};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, Set,
};
use tracing::info;

use crate::entities::{articles, prelude::*};
use crate::models::{Article, ArticleInput};

pub struct ArticleRepository {
    conn: DatabaseConnection,
}

impl ArticleRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn list(&self) -> Result<Vec<Article>> {
        let rows = Articles::find()
            .order_by_asc(articles::Column::Code)
            .all(&self.conn)
            .await
            .context("Failed to list articles")?;

        Ok(rows.into_iter().map(Article::from).collect())
    }

    pub async fn get(&self, id: i32) -> Result<Option<Article>> {
        let row = Articles::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query article by id")?;

        Ok(row.map(Article::from))
    }

    /// Case-insensitive lookup by code, for the uniqueness invariant.
    pub async fn find_by_code_ci(&self, code: &str) -> Result<Option<Article>> {
        let row = Articles::find()
            .filter(
                Expr::expr(Func::lower(Expr::col(articles::Column::Code)))
                    .eq(code.to_lowercase()),
            )
            .one(&self.conn)
            .await
            .context("Failed to query article by code")?;

        Ok(row.map(Article::from))
    }

    /// Substring search over code, description and type, as served by the
    /// public search endpoint.
    pub async fn search(&self, term: &str) -> Result<Vec<Article>> {
        let rows = Articles::find()
            .filter(
                Condition::any()
                    .add(articles::Column::Code.contains(term))
                    .add(articles::Column::Description.contains(term))
                    .add(articles::Column::ArticleType.contains(term)),
            )
            .order_by_asc(articles::Column::Code)
            .all(&self.conn)
            .await
            .context("Failed to search articles")?;

        Ok(rows.into_iter().map(Article::from).collect())
    }

    pub async fn insert(&self, input: &ArticleInput) -> Result<Article> {
        let active = articles::ActiveModel {
            code: Set(input.code.clone()),
            description: Set(input.description.clone()),
            demar: Set(input.demar.clone()),
            prix_vente: Set(input.prix_vente),
            achat_minimum: Set(input.achat_minimum),
            unite: Set(input.unite.clone()),
            article_type: Set(input.article_type.clone()),
            ..Default::default()
        };

        let model = active
            .insert(&self.conn)
            .await
            .context("Failed to insert article")?;

        info!("Created article {} ({})", model.code, model.id);
        Ok(Article::from(model))
    }

    /// Applies `input` to an existing row. Returns `None` when the id is
    /// unknown.
    pub async fn update(&self, id: i32, input: &ArticleInput) -> Result<Option<Article>> {
        let Some(existing) = Articles::find_by_id(id).one(&self.conn).await? else {
            return Ok(None);
        };

        let mut active: articles::ActiveModel = existing.into();
        active.code = Set(input.code.clone());
        active.description = Set(input.description.clone());
        active.demar = Set(input.demar.clone());
        active.prix_vente = Set(input.prix_vente);
        active.achat_minimum = Set(input.achat_minimum);
        active.unite = Set(input.unite.clone());
        active.article_type = Set(input.article_type.clone());

        let model = active
            .update(&self.conn)
            .await
            .context("Failed to update article")?;

        Ok(Some(Article::from(model)))
    }

    pub async fn delete(&self, id: i32) -> Result<bool> {
        let result = Articles::delete_by_id(id)
            .exec(&self.conn)
            .await
            .context("Failed to delete article")?;

        Ok(result.rows_affected > 0)
    }
}
