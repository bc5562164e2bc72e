mod register;
mod signin;
mod signout;

use axum::{routing::get, Router};

use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register", get(register::register_page).post(register::register))
        .route("/signin", get(signin::signin_page).post(signin::signin))
        .route("/signout", get(signout::signout))
}

/// Only same-site paths are followed after signing in or out.
pub(crate) fn local_path(return_url: Option<String>, fallback: &str) -> String {
    match return_url {
        Some(url) if url.starts_with('/') && !url.starts_with("//") => url,
        _ => fallback.to_owned(),
    }
}
