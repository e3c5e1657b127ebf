use axum::{
    Json,
    extract::{Request, State},
    http::{HeaderMap, HeaderValue, header},
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::{ApiError, AppState};
use crate::models::Role;

#[derive(Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: UserInfo,
}

#[derive(Serialize)]
pub struct UserInfo {
    pub id: i32,
    pub name: String,
    pub role: Role,
}

/// POST /api/auth/login
///
/// Returns the token in the body for API clients and sets it as an httpOnly
/// cookie for the browser console. Unknown username and wrong password
/// produce the same response.
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<LoginRequest>,
) -> Result<Response, ApiError> {
    // No field pre-checks: empty credentials fail verification like any
    // other bad pair, keeping every failure response identical.
    let result = state
        .auth_service
        .login(&payload.username, &payload.password)
        .await?;

    let mut cookie = format!(
        "token={}; HttpOnly; SameSite=Strict; Path=/; Max-Age={}",
        result.token,
        state.tokens.ttl_seconds()
    );
    if state.config.server.secure_cookies {
        cookie.push_str("; Secure");
    }

    let body = LoginResponse {
        token: result.token,
        user: UserInfo {
            id: result.account.id,
            name: result.account.name,
            role: result.account.role,
        },
    };

    let mut response = Json(body).into_response();
    response.headers_mut().insert(
        header::SET_COOKIE,
        HeaderValue::from_str(&cookie)
            .map_err(|e| ApiError::Internal(format!("Invalid cookie value: {e}")))?,
    );
    Ok(response)
}

/// Gate for the /api/admin routes: a valid token with the admin role is
/// required. The resolved identity is made available to handlers as an
/// `AuthContext` extension.
pub async fn auth_middleware(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let Some(token) = extract_token(&headers) else {
        return Err(ApiError::Unauthorized(
            "Authentification requise".to_string(),
        ));
    };

    let ctx = state.tokens.verify(&token)?;

    if ctx.role != Role::Admin {
        return Err(ApiError::Forbidden("Accès réservé aux administrateurs".to_string()));
    }

    request.extensions_mut().insert(ctx);
    Ok(next.run(request).await)
}

/// Looks for the token in `Authorization: Bearer` first, then in the
/// `token` cookie set at login.
fn extract_token(headers: &HeaderMap) -> Option<String> {
    if let Some(auth_header) = headers.get(header::AUTHORIZATION)
        && let Ok(auth_str) = auth_header.to_str()
        && let Some(token) = auth_str.strip_prefix("Bearer ")
    {
        return Some(token.trim().to_string());
    }

    if let Some(cookies) = headers.get(header::COOKIE)
        && let Ok(cookie_str) = cookies.to_str()
    {
        for pair in cookie_str.split(';') {
            if let Some(value) = pair.trim().strip_prefix("token=") {
                return Some(value.to_string());
            }
        }
    }

    None
}
