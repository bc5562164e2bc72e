mod index;
mod msg;
mod new;
mod page;
mod private;
mod room;
mod ws;

use axum::{routing::get, Router};

use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(index::index))
        .route("/rooms", get(index::index).post(new::new_room))
        .route("/rooms/ws", get(ws::rooms_ws))
        .route("/rooms/{id}", get(room::room))
        .route("/rooms/{id}/messages", get(room::back_to_room).post(msg::send_msg))
        .route("/rooms/{id}/ws", get(ws::room_ws))
        .route("/users", get(index::index))
        .route("/users/{id}", get(private::private_room))
}
