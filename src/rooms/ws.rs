use axum::{
    debug_handler,
    extract::{
        ws::rejection::WebSocketUpgradeRejection,
        ws::{Message, WebSocket},
        State, WebSocketUpgrade,
    },
    response::{IntoResponse, Response},
};
use futures_util::{SinkExt, StreamExt};
use tokio::sync::broadcast::{self, error::RecvError};

use crate::{
    db::Repository,
    events::{Event, Notifier},
    extract::ApiPath,
    session::CurrentUser,
    AppResult, AppState,
};

use super::{index, msg};

/// Streams every newly created public room as a list item.
#[debug_handler(state = AppState)]
pub(crate) async fn rooms_ws(
    State(notifier): State<Notifier>,
    _viewer: CurrentUser,
    ws: WebSocketUpgrade,
) -> Response {
    let rx = notifier.subscribe();

    ws.on_upgrade(move |socket| {
        forward(socket, rx, |event| match event {
            Event::RoomCreated(room) => Some(index::room_item(room)),
            _ => None,
        })
    })
}

/// Streams new messages of one room. The room must be visible to the viewer
/// before the handshake itself is looked at.
#[debug_handler(state = AppState)]
pub(crate) async fn room_ws(
    State(repo): State<Repository>,
    State(notifier): State<Notifier>,
    CurrentUser(user): CurrentUser,
    ApiPath(room_id): ApiPath<i64>,
    ws: Result<WebSocketUpgrade, WebSocketUpgradeRejection>,
) -> AppResult<Response> {
    repo.visible_room(room_id, user.id).await?;
    let ws = match ws {
        Ok(ws) => ws,
        Err(rejection) => return Ok(rejection.into_response()),
    };
    let rx = notifier.subscribe();

    Ok(ws.on_upgrade(move |socket| {
        forward(socket, rx, move |event| match event {
            Event::MessageCreated(entry) if entry.message.room_id == room_id => {
                Some(msg::msg_to_html(entry))
            }
            _ => None,
        })
    }))
}

async fn forward<F>(socket: WebSocket, mut rx: broadcast::Receiver<Event>, render: F)
where
    F: Fn(&Event) -> Option<String> + Send + 'static,
{
    let (mut sender, mut receiver) = socket.split();

    let mut broadcast_task = tokio::spawn(async move {
        loop {
            match rx.recv().await {
                Ok(event) => {
                    let Some(html) = render(&event) else {
                        continue;
                    };
                    if sender.send(Message::Text(html.into())).await.is_err() {
                        break;
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "viewer fell behind the broadcast");
                }
                Err(RecvError::Closed) => break,
            }
        }
    });

    // Viewers only listen; anything they send is drained until they close.
    let mut receive_task = tokio::spawn(async move {
        while let Some(Ok(msg)) = receiver.next().await {
            if let Message::Close(_) = msg {
                break;
            }
        }
    });

    tokio::select! {
        _ = &mut broadcast_task => receive_task.abort(),
        _ = &mut receive_task => broadcast_task.abort(),
    };
}
