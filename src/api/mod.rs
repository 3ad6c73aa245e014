use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::HeaderValue,
    middleware,
    routing::{get, post, put},
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tower_sessions::{Expiry, ExpiredDeletion, SessionManagerLayer};
use tower_sessions_sqlx_store::SqliteStore;

use crate::config::Config;
use crate::constants::images::MAX_UPLOAD_BYTES;
use crate::db::Store;
use crate::services::{ImageService, MailerService, ResetTokenService};
use crate::state::SharedState;

mod account;
pub mod auth;
mod error;
mod observability;
mod posts;
mod system;
mod types;
mod users;
mod validation;

pub use error::ApiError;
pub use types::*;

use metrics_exporter_prometheus::PrometheusHandle;
use tokio::sync::RwLock;

#[derive(Clone)]
pub struct AppState {
    pub shared: Arc<SharedState>,

    pub start_time: std::time::Instant,

    pub prometheus_handle: Option<PrometheusHandle>,
}

impl AppState {
    #[must_use]
    pub fn config(&self) -> &Arc<RwLock<Config>> {
        &self.shared.config
    }

    #[must_use]
    pub fn store(&self) -> &Store {
        &self.shared.store
    }

    #[must_use]
    pub fn image_service(&self) -> &Arc<ImageService> {
        &self.shared.image_service
    }

    #[must_use]
    pub fn mailer(&self) -> &Arc<MailerService> {
        &self.shared.mailer
    }

    #[must_use]
    pub fn reset_tokens(&self) -> &Arc<ResetTokenService> {
        &self.shared.reset_tokens
    }
}

pub async fn create_app_state(
    shared: Arc<SharedState>,
    prometheus_handle: Option<PrometheusHandle>,
) -> anyhow::Result<Arc<AppState>> {
    shared
        .image_service
        .ensure_default()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to prepare media directory: {e}"))?;

    Ok(Arc::new(AppState {
        shared,
        start_time: std::time::Instant::now(),
        prometheus_handle,
    }))
}

pub async fn create_app_state_from_config(
    config: Config,
    prometheus_handle: Option<PrometheusHandle>,
) -> anyhow::Result<Arc<AppState>> {
    let shared = Arc::new(SharedState::new(config).await?);
    create_app_state(shared, prometheus_handle).await
}

pub async fn router(state: Arc<AppState>) -> anyhow::Result<Router> {
    let (media_path, cors_origins, secure_cookies, session_minutes) = {
        let config = state.config().read().await;
        (
            config.general.media_path.clone(),
            config.server.cors_allowed_origins.clone(),
            config.server.secure_cookies,
            config.server.session_minutes,
        )
    };

    // Sessions live in the same SQLite file as the application data.
    let session_store = SqliteStore::new(state.store().conn.get_sqlite_connection_pool().clone());
    session_store.migrate().await?;

    tokio::task::spawn(
        session_store
            .clone()
            .continuously_delete_expired(tokio::time::Duration::from_secs(60)),
    );

    let session_layer = SessionManagerLayer::new(session_store)
        .with_secure(secure_cookies)
        .with_same_site(tower_sessions::cookie::SameSite::Lax)
        .with_expiry(Expiry::OnInactivity(time::Duration::minutes(
            session_minutes,
        )));

    // Post mutations check the session themselves (the handlers reject
    // anonymous callers), so reads and writes can share a method router.
    let public_routes = Router::new()
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/auth/reset-request", post(auth::reset_request))
        .route("/auth/reset-password/{token}", post(auth::reset_password))
        .route("/users", get(users::user_list))
        .route("/users/{username}/posts", get(users::user_posts))
        .route("/posts", get(posts::feed).post(posts::create_post))
        .route(
            "/posts/{id}",
            get(posts::get_post)
                .put(posts::update_post)
                .delete(posts::delete_post),
        );

    let protected_routes = Router::new()
        .route("/auth/logout", post(auth::logout))
        .route("/account", get(account::get_account))
        .route("/account", put(account::update_account))
        .route(
            "/account/picture",
            post(account::upload_picture).layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES)),
        )
        .route("/system/status", get(system::get_status))
        .route("/metrics", get(observability::get_metrics))
        .route_layer(middleware::from_fn(auth::auth_middleware));

    let api_router = Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(session_layer)
        .with_state(state);

    let cors_layer = if cors_origins.contains(&"*".to_string()) {
        CorsLayer::new().allow_origin(Any)
    } else {
        let origins: Vec<HeaderValue> =
            cors_origins.iter().filter_map(|s| s.parse().ok()).collect();
        CorsLayer::new().allow_origin(origins)
    };

    Ok(Router::new()
        .nest("/api", api_router)
        .nest_service("/media", ServeDir::new(media_path))
        .layer(cors_layer.allow_methods(Any).allow_headers(Any))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(observability::logging_middleware)))
}
