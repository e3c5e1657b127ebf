use axum::{
    Router,
    http::HeaderValue,
    middleware,
    routing::{delete, get, post, put},
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::db::Store;
use crate::services::{
    AccountService, AuthService, CatalogService, SeaOrmAccountService, SeaOrmAuthService,
    SeaOrmCatalogService, TokenService,
};

pub mod accounts;
pub mod articles;
pub mod auth;
mod error;

pub use error::ApiError;

pub struct AppState {
    pub store: Store,
    pub config: Config,
    pub tokens: TokenService,
    pub auth_service: Arc<dyn AuthService>,
    pub catalog_service: Arc<dyn CatalogService>,
    pub account_service: Arc<dyn AccountService>,
}

pub async fn create_app_state(config: Config) -> anyhow::Result<Arc<AppState>> {
    let store = Store::new(&config.general.database_path).await?;

    let tokens = TokenService::new(&config.auth.jwt_secret, config.auth.token_ttl_minutes);

    let auth_service = Arc::new(SeaOrmAuthService::new(store.clone(), tokens.clone()));
    let catalog_service = Arc::new(SeaOrmCatalogService::new(store.clone()));
    let account_service = Arc::new(SeaOrmAccountService::new(
        store.clone(),
        config.security.clone(),
        config.auth.principal_account_id,
    ));

    Ok(Arc::new(AppState {
        store,
        config,
        tokens,
        auth_service,
        catalog_service,
        account_service,
    }))
}

pub fn router(state: Arc<AppState>) -> Router {
    let cors_origins = state.config.server.cors_allowed_origins.clone();

    let public_routes = Router::new()
        .route("/public/articles", get(articles::list))
        .route("/public/articles/search", get(articles::search))
        .route("/auth/login", post(auth::login));

    let admin_routes = Router::new()
        .route("/admin/articles", get(articles::list))
        .route("/admin/articles", post(articles::create))
        .route("/admin/articles/{id}", put(articles::update))
        .route("/admin/articles/{id}", delete(articles::delete))
        .route("/admin/users", get(accounts::list))
        .route("/admin/users", post(accounts::create))
        .route("/admin/users/{id}", put(accounts::update))
        .route("/admin/users/{id}", delete(accounts::delete))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::auth_middleware,
        ));

    let api_router = Router::new()
        .merge(public_routes)
        .merge(admin_routes)
        .with_state(state);

    let cors_layer = if cors_origins.contains(&"*".to_string()) {
        CorsLayer::new().allow_origin(Any)
    } else {
        let origins: Vec<HeaderValue> =
            cors_origins.iter().filter_map(|s| s.parse().ok()).collect();
        CorsLayer::new().allow_origin(origins)
    };

    Router::new()
        .nest("/api", api_router)
        .layer(cors_layer.allow_methods(Any).allow_headers(Any))
        .layer(TraceLayer::new_for_http())
}
