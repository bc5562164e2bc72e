use axum::{
    debug_handler,
    extract::State,
    response::{Html, IntoResponse, Redirect, Response},
};

use crate::{
    db::{DbError, FeedMessage, Repository, Room},
    extract::PagePath,
    include_res, res,
    res::escape,
    session::CurrentUser,
    AppResult, AppState,
};

use super::{msg, page};

#[debug_handler(state = AppState)]
pub(crate) async fn room(
    State(repo): State<Repository>,
    current: Option<CurrentUser>,
    PagePath(room_id): PagePath<i64>,
) -> AppResult<Response> {
    let Some(CurrentUser(user)) = current else {
        return Ok(Redirect::to(&format!("/signin?return_url=/rooms/{room_id}")).into_response());
    };

    let room = match repo.visible_room(room_id, user.id).await {
        Ok(room) => room,
        Err(DbError::NotFound(_)) => return res::sorry("room"),
        Err(err) => return Err(err.into()),
    };

    Ok(Html(page::render(&repo, &user, Some(&room), &[]).await?).into_response())
}

#[debug_handler]
pub(crate) async fn back_to_room(PagePath(room_id): PagePath<i64>) -> Redirect {
    Redirect::to(&format!("/rooms/{room_id}"))
}

pub(crate) fn panel(room: &Room, feed: &[FeedMessage]) -> String {
    let messages: String = feed.iter().map(msg::msg_to_html).collect();

    include_res!(str, "/pages/rooms/room.html")
        .replace("{room_id}", &room.id.to_string())
        .replace("{room_name}", &escape(&room.name))
        .replace("{messages}", &messages)
}
