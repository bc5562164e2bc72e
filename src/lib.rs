pub mod api;
pub mod appresult;
pub mod auth;
pub mod config;
pub mod db;
pub mod events;
pub mod extract;
pub mod health;
pub mod res;
pub mod rooms;
pub mod session;

use axum::{extract::FromRef, middleware, routing::get, Router};
use sqlx::SqlitePool;
use tower_http::trace::TraceLayer;
use tower_sessions::{cookie::SameSite, Expiry, MemoryStore, SessionManagerLayer};

pub use appresult::{AppError, AppResult};
use config::Config;
use db::Repository;
use events::Notifier;

#[derive(Clone, FromRef)]
pub struct AppState {
    pub repo: Repository,
    pub notifier: Notifier,
}

impl AppState {
    pub fn new(pool: SqlitePool, config: &Config) -> Self {
        Self {
            repo: Repository::new(pool),
            notifier: Notifier::new(config.broadcast_capacity),
        }
    }
}

pub fn router(state: AppState, config: &Config) -> Router {
    let session_layer = SessionManagerLayer::new(MemoryStore::default())
        .with_secure(config.secure_cookies)
        .with_same_site(SameSite::Lax)
        .with_expiry(Expiry::OnInactivity(config.session_inactivity));

    Router::new()
        .merge(health::router())
        .merge(auth::router())
        .merge(rooms::router())
        .nest("/api/v1", api::router())
        .route("/assets/{file}", get(res::asset))
        .layer(middleware::from_fn_with_state(state.clone(), session::load_current_user))
        .with_state(state)
        .layer(session_layer)
        .layer(TraceLayer::new_for_http())
}
