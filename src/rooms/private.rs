use axum::{
    debug_handler,
    extract::State,
    response::{Html, IntoResponse, Redirect, Response},
};

use crate::{
    db::{DbError, Repository},
    events::Notifier,
    extract::PagePath,
    res,
    session::CurrentUser,
    AppResult, AppState,
};

use super::page;

/// Opens the direct room between the viewer and user `id`.
#[debug_handler(state = AppState)]
pub(crate) async fn private_room(
    State(repo): State<Repository>,
    State(notifier): State<Notifier>,
    current: Option<CurrentUser>,
    PagePath(other_id): PagePath<i64>,
) -> AppResult<Response> {
    let Some(CurrentUser(user)) = current else {
        return Ok(Redirect::to("/signin").into_response());
    };
    if other_id == user.id {
        return Ok(Redirect::to("/").into_response());
    }

    let other = match repo.find_user(other_id).await {
        Ok(other) => other,
        Err(DbError::NotFound(_)) => return res::sorry("user"),
        Err(err) => return Err(err.into()),
    };

    let created = repo.direct_room(&user, &other).await?;
    notifier.publish(created.events);

    Ok(Html(page::render(&repo, &user, Some(&created.record), &[]).await?).into_response())
}
