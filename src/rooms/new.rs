use axum::{
    debug_handler,
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    Form,
};
use serde::Deserialize;

use crate::{
    db::{DbError, Repository},
    events::{Created, Notifier},
    session::CurrentUser,
    AppResult, AppState,
};

use super::page;

#[derive(Debug, Deserialize)]
pub(crate) struct NewRoomForm {
    #[serde(rename = "room[name]", default)]
    name: String,
}

#[debug_handler(state = AppState)]
pub(crate) async fn new_room(
    State(repo): State<Repository>,
    State(notifier): State<Notifier>,
    current: Option<CurrentUser>,
    Form(NewRoomForm { name }): Form<NewRoomForm>,
) -> AppResult<Response> {
    let Some(CurrentUser(user)) = current else {
        return Ok(Redirect::to("/signin").into_response());
    };

    match repo.create_room(&name).await {
        Ok(Created { record: room, events }) => {
            notifier.publish(events);
            Ok(Redirect::to(&format!("/rooms/{}", room.id)).into_response())
        }
        Err(DbError::Invalid(errors)) => Ok((
            StatusCode::UNPROCESSABLE_ENTITY,
            Html(page::render(&repo, &user, None, &errors).await?),
        )
            .into_response()),
        Err(err) => Err(err.into()),
    }
}
