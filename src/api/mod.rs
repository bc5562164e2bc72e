//! JSON API under `/api/v1`. Everything except the public room list needs a
//! session.

mod chat_rooms;
mod messages;
mod rooms;

use axum::{
    routing::{delete, get, post, put},
    Router,
};

use crate::{session::CurrentUser, AppError, AppState};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/rooms", get(rooms::index).post(rooms::create))
        .route("/rooms/{id}", get(rooms::show))
        .route("/messages", get(not_implemented).post(messages::create))
        .route("/friends", post(not_implemented))
        .route("/friends/{id}", delete(not_implemented))
        .route("/chat_rooms/join", post(chat_rooms::join))
        .route("/chat_rooms/leave", post(chat_rooms::leave))
        .route("/chat_rooms/message", post(chat_rooms::message))
        .nest("/admin", admin_router())
}

fn admin_router() -> Router<AppState> {
    Router::new()
        .route("/invite", post(not_implemented))
        .route("/promote", post(not_implemented))
        .route("/ban", post(not_implemented))
        .route("/edit_user", put(not_implemented))
        .route("/reset_keys", post(not_implemented))
}

/// Routes the API reserves but does not serve yet.
async fn not_implemented(_: CurrentUser) -> AppError {
    AppError::NotImplemented
}
