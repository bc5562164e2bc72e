use axum::{
    debug_handler,
    extract::State,
    response::{Html, IntoResponse, Redirect, Response},
};

use crate::{
    db::{Repository, Room, User},
    include_res,
    res::escape,
    session::CurrentUser,
    AppResult, AppState,
};

use super::page;

#[debug_handler(state = AppState)]
pub(crate) async fn index(
    State(repo): State<Repository>,
    current: Option<CurrentUser>,
) -> AppResult<Response> {
    let Some(CurrentUser(user)) = current else {
        return Ok(Redirect::to("/signin").into_response());
    };

    Ok(Html(page::render(&repo, &user, None, &[]).await?).into_response())
}

pub(crate) fn room_item(room: &Room) -> String {
    include_res!(str, "/pages/room_item.html")
        .replace("{id}", &room.id.to_string())
        .replace("{name}", &escape(&room.name))
}

pub(crate) fn user_item(user: &User) -> String {
    include_res!(str, "/pages/user_item.html")
        .replace("{id}", &user.id.to_string())
        .replace("{username}", &escape(&user.username))
}
