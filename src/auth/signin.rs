use axum::{
    debug_handler,
    extract::{Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    Form,
};
use serde::Deserialize;
use tower_sessions::Session;

use crate::{
    db::Repository,
    include_res,
    res::{self, escape},
    session, AppResult, AppState,
};

#[derive(Deserialize)]
pub(crate) struct SigninQuery {
    pub(crate) return_url: Option<String>,
}

#[derive(Deserialize)]
pub(crate) struct SigninForm {
    #[serde(default)]
    username: String,
    return_url: Option<String>,
}

fn signin_form(errors: &[String], username: &str, return_url: Option<&str>) -> String {
    include_res!(str, "/pages/signin.html")
        .replace("{errors}", &res::errors(errors))
        .replace("{return_url}", &escape(return_url.unwrap_or("/")))
        .replace("{username}", &escape(username))
}

#[debug_handler]
pub(crate) async fn signin_page(
    Query(SigninQuery { return_url }): Query<SigninQuery>,
) -> impl IntoResponse {
    Html(signin_form(&[], "", return_url.as_deref()))
}

#[debug_handler(state = AppState)]
pub(crate) async fn signin(
    State(repo): State<Repository>,
    session: Session,
    Form(SigninForm { username, return_url }): Form<SigninForm>,
) -> AppResult<Response> {
    let Some(user) = repo.find_user_by_username(&username).await? else {
        tracing::info!("sign-in refused for unknown @{username}");
        return Ok((
            StatusCode::UNPROCESSABLE_ENTITY,
            Html(signin_form(&["Invalid username".to_owned()], &username, return_url.as_deref())),
        )
            .into_response());
    };

    session::log_in(&session, &user).await?;
    Ok(Redirect::to(&super::local_path(return_url, "/")).into_response())
}
