use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use std::sync::Arc;

use super::{ApiError, AppState};
use crate::models::{Article, ArticleInput};

#[derive(Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
}

/// GET /api/public/articles
pub async fn list(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Article>>, ApiError> {
    Ok(Json(state.catalog_service.list().await?))
}

/// GET /api/public/articles/search?q=
pub async fn search(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<Article>>, ApiError> {
    let Some(term) = query.q.filter(|q| !q.is_empty()) else {
        return Err(ApiError::Validation(
            "Le paramètre de recherche 'q' est requis".to_string(),
        ));
    };

    Ok(Json(state.catalog_service.search(&term).await?))
}

/// POST /api/admin/articles
pub async fn create(
    State(state): State<Arc<AppState>>,
    Json(input): Json<ArticleInput>,
) -> Result<impl IntoResponse, ApiError> {
    let article = state.catalog_service.create(input).await?;
    Ok((StatusCode::CREATED, Json(article)))
}

/// PUT /api/admin/articles/{id}
pub async fn update(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    Json(input): Json<ArticleInput>,
) -> Result<Json<Article>, ApiError> {
    Ok(Json(state.catalog_service.update(id, input).await?))
}

/// DELETE /api/admin/articles/{id}
pub async fn delete(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<StatusCode, ApiError> {
    state.catalog_service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
