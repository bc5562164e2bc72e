use axum::{debug_handler, extract::State, http::StatusCode, Json};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::{
    db::{Repository, User},
    events::{Created, Notifier},
    extract::ApiJson,
    session::CurrentUser,
    AppResult, AppState,
};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct CreateMessageRequest {
    room_id: Option<i64>,
    message: MessageParams,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct MessageParams {
    #[serde(default)]
    content: String,
}

/// POST /api/v1/messages
#[debug_handler(state = AppState)]
pub(crate) async fn create(
    CurrentUser(user): CurrentUser,
    State(repo): State<Repository>,
    State(notifier): State<Notifier>,
    ApiJson(request): ApiJson<CreateMessageRequest>,
) -> AppResult<(StatusCode, Json<Value>)> {
    post(&repo, &notifier, &user, request).await
}

pub(crate) async fn post(
    repo: &Repository,
    notifier: &Notifier,
    user: &User,
    CreateMessageRequest { room_id, message }: CreateMessageRequest,
) -> AppResult<(StatusCode, Json<Value>)> {
    let Created { record: message, events } = repo.create_message(user, room_id, &message.content).await?;
    notifier.publish(events);

    Ok((
        StatusCode::CREATED,
        Json(json!({ "status": "success", "message": message })),
    ))
}
