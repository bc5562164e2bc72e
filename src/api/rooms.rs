use axum::{debug_handler, extract::State, http::StatusCode, Json};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::{
    db::{MessageSummary, Repository, RoomSummary},
    events::{Created, Notifier},
    extract::{ApiJson, ApiPath},
    session::CurrentUser,
    AppResult, AppState,
};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct CreateRoomRequest {
    room: RoomParams,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct RoomParams {
    #[serde(default)]
    name: String,
}

/// GET /api/v1/rooms
#[debug_handler(state = AppState)]
pub(crate) async fn index(State(repo): State<Repository>) -> AppResult<Json<Value>> {
    let rooms: Vec<RoomSummary> = repo.public_rooms().await?.iter().map(RoomSummary::from).collect();
    Ok(Json(json!({ "rooms": rooms })))
}

/// GET /api/v1/rooms/{id}
#[debug_handler(state = AppState)]
pub(crate) async fn show(
    CurrentUser(user): CurrentUser,
    State(repo): State<Repository>,
    ApiPath(room_id): ApiPath<i64>,
) -> AppResult<Json<Value>> {
    let room = repo.visible_room(room_id, user.id).await?;
    let messages: Vec<MessageSummary> = repo
        .room_messages(room.id)
        .await?
        .iter()
        .map(MessageSummary::from)
        .collect();

    Ok(Json(json!({
        "room": RoomSummary::from(&room),
        "messages": messages,
    })))
}

/// POST /api/v1/rooms
#[debug_handler(state = AppState)]
pub(crate) async fn create(
    CurrentUser(user): CurrentUser,
    State(repo): State<Repository>,
    State(notifier): State<Notifier>,
    ApiJson(CreateRoomRequest { room }): ApiJson<CreateRoomRequest>,
) -> AppResult<(StatusCode, Json<Value>)> {
    let Created { record: room, events } = repo.create_room(&room.name).await?;
    notifier.publish(events);
    tracing::info!(room_id = room.id, user_id = user.id, "room created over api");

    Ok((
        StatusCode::CREATED,
        Json(json!({ "status": "success", "room": RoomSummary::from(&room) })),
    ))
}
