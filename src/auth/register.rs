use axum::{
    debug_handler,
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    Form,
};
use serde::Deserialize;
use tower_sessions::Session;

use crate::{
    db::{DbError, Repository},
    include_res,
    res::{self, escape},
    session, AppResult, AppState,
};

#[derive(Deserialize)]
pub(crate) struct RegisterForm {
    #[serde(default)]
    username: String,
}

fn register_form(errors: &[String], username: &str) -> String {
    include_res!(str, "/pages/register.html")
        .replace("{errors}", &res::errors(errors))
        .replace("{username}", &escape(username))
}

#[debug_handler]
pub(crate) async fn register_page() -> impl IntoResponse {
    Html(register_form(&[], ""))
}

#[debug_handler(state = AppState)]
pub(crate) async fn register(
    State(repo): State<Repository>,
    session: Session,
    Form(RegisterForm { username }): Form<RegisterForm>,
) -> AppResult<Response> {
    match repo.create_user(&username).await {
        Ok(user) => {
            tracing::info!(user_id = user.id, "registered @{}", user.username);
            session::log_in(&session, &user).await?;
            Ok(Redirect::to("/").into_response())
        }
        Err(DbError::Invalid(errors)) => Ok((
            StatusCode::UNPROCESSABLE_ENTITY,
            Html(register_form(&errors, &username)),
        )
            .into_response()),
        Err(err) => Err(err.into()),
    }
}
