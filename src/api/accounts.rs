use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use std::sync::Arc;

use super::{ApiError, AppState};
use crate::models::{Account, AccountInput};
use crate::services::AuthContext;

/// GET /api/admin/users
pub async fn list(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Account>>, ApiError> {
    Ok(Json(state.account_service.list().await?))
}

/// POST /api/admin/users
pub async fn create(
    State(state): State<Arc<AppState>>,
    Json(input): Json<AccountInput>,
) -> Result<impl IntoResponse, ApiError> {
    let account = state.account_service.create(input).await?;
    Ok((StatusCode::CREATED, Json(account)))
}

/// PUT /api/admin/users/{id}
pub async fn update(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    Json(input): Json<AccountInput>,
) -> Result<Json<Account>, ApiError> {
    Ok(Json(state.account_service.update(id, input).await?))
}

/// DELETE /api/admin/users/{id}
///
/// The caller's identity matters here: deleting your own account or the
/// principal administrator is refused.
pub async fn delete(
    State(state): State<Arc<AppState>>,
    Extension(ctx): Extension<AuthContext>,
    Path(id): Path<i32>,
) -> Result<StatusCode, ApiError> {
    state.account_service.delete(id, ctx.account_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
