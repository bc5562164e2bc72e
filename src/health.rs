use axum::{extract::State, http::StatusCode, routing::get, Router};

use crate::{db::Repository, AppState};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/ping", get(pong))
        .route("/up", get(up))
}

async fn pong() -> &'static str {
    "pong"
}

/// 200 when the database answers, 500 otherwise.
async fn up(State(repo): State<Repository>) -> StatusCode {
    match repo.ping().await {
        Ok(()) => StatusCode::OK,
        Err(err) => {
            tracing::error!("health check failed: {err}");
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}
