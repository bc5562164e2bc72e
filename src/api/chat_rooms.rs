use axum::{debug_handler, extract::State, http::StatusCode, Json};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::{
    db::{Repository, RoomSummary},
    events::Notifier,
    extract::ApiJson,
    session::CurrentUser,
    AppResult, AppState,
};

use super::messages::{self, CreateMessageRequest};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct MembershipRequest {
    room_id: i64,
}

/// POST /api/v1/chat_rooms/join
#[debug_handler(state = AppState)]
pub(crate) async fn join(
    CurrentUser(user): CurrentUser,
    State(repo): State<Repository>,
    ApiJson(MembershipRequest { room_id }): ApiJson<MembershipRequest>,
) -> AppResult<Json<Value>> {
    let room = repo.join_room(user.id, room_id).await?;
    tracing::info!(room_id, user_id = user.id, "joined room");
    Ok(Json(json!({ "status": "success", "room": RoomSummary::from(&room) })))
}

/// POST /api/v1/chat_rooms/leave
#[debug_handler(state = AppState)]
pub(crate) async fn leave(
    CurrentUser(user): CurrentUser,
    State(repo): State<Repository>,
    ApiJson(MembershipRequest { room_id }): ApiJson<MembershipRequest>,
) -> AppResult<Json<Value>> {
    let room = repo.leave_room(user.id, room_id).await?;
    tracing::info!(room_id, user_id = user.id, "left room");
    Ok(Json(json!({ "status": "success", "room": RoomSummary::from(&room) })))
}

/// POST /api/v1/chat_rooms/message
#[debug_handler(state = AppState)]
pub(crate) async fn message(
    CurrentUser(user): CurrentUser,
    State(repo): State<Repository>,
    State(notifier): State<Notifier>,
    ApiJson(request): ApiJson<CreateMessageRequest>,
) -> AppResult<(StatusCode, Json<Value>)> {
    messages::post(&repo, &notifier, &user, request).await
}
