use axum::{
    debug_handler,
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    Form,
};
use pulldown_cmark::{Event, Parser, Tag};
use serde::Deserialize;
use time::format_description::well_known::Rfc3339;

use crate::{
    db::{DbError, FeedMessage, Repository},
    events::{Created, Notifier},
    extract::PagePath,
    include_res, res,
    res::escape,
    session::CurrentUser,
    AppResult, AppState,
};

use super::page;

#[derive(Deserialize)]
pub(crate) struct SendMessageForm {
    #[serde(rename = "message[content]", default)]
    content: String,
}

#[debug_handler(state = AppState)]
pub(crate) async fn send_msg(
    State(repo): State<Repository>,
    State(notifier): State<Notifier>,
    current: Option<CurrentUser>,
    PagePath(room_id): PagePath<i64>,
    Form(SendMessageForm { content }): Form<SendMessageForm>,
) -> AppResult<Response> {
    let Some(CurrentUser(user)) = current else {
        return Ok(Redirect::to("/signin").into_response());
    };

    match repo.create_message(&user, Some(room_id), &content).await {
        Ok(Created { events, .. }) => {
            notifier.publish(events);
            Ok(Redirect::to(&format!("/rooms/{room_id}")).into_response())
        }
        Err(DbError::Invalid(errors)) => {
            let room = match repo.visible_room(room_id, user.id).await {
                Ok(room) => room,
                Err(DbError::NotFound(_)) => return res::sorry("room"),
                Err(err) => return Err(err.into()),
            };
            Ok((
                StatusCode::UNPROCESSABLE_ENTITY,
                Html(page::render(&repo, &user, Some(&room), &errors).await?),
            )
                .into_response())
        }
        Err(err) => Err(err.into()),
    }
}

pub(crate) fn msg_to_html(entry: &FeedMessage) -> String {
    let message = &entry.message;

    include_res!(str, "/pages/rooms/message.html")
        .replace("{author}", &escape(&entry.author))
        .replace("{id}", &message.id.to_string())
        .replace("{created_at}", &message.created_at.format(&Rfc3339).unwrap_or_default())
        .replace("{content}", &markdown(&message.content))
}

/// Markdown to HTML with any raw HTML shown as text and unsafe link targets
/// replaced by `#`. Braces are escaped so rendered content cannot reach the
/// page template placeholders.
pub(crate) fn markdown(content: &str) -> String {
    let parser = Parser::new(content).map(|event| match event {
        Event::Html(html) | Event::InlineHtml(html) => Event::Text(html),
        Event::Start(Tag::Link { link_type, dest_url, title, id }) if !safe_url(&dest_url) => {
            Event::Start(Tag::Link { link_type, dest_url: "#".into(), title, id })
        }
        Event::Start(Tag::Image { link_type, dest_url, title, id }) if !safe_url(&dest_url) => {
            Event::Start(Tag::Image { link_type, dest_url: "#".into(), title, id })
        }
        _ => event,
    });

    let mut html = String::new();
    pulldown_cmark::html::push_html(&mut html, parser);
    html.replace('{', "&#123;").replace('}', "&#125;")
}

/// Relative targets and http, https or mailto. Browsers ignore whitespace and
/// control characters inside a scheme, so those are dropped before matching.
fn safe_url(url: &str) -> bool {
    let url: String = url.chars().filter(|c| !c.is_ascii_whitespace() && !c.is_control()).collect();

    match url.find([':', '/', '?', '#']) {
        Some(at) if url[at..].starts_with(':') => {
            matches!(url[..at].to_ascii_lowercase().as_str(), "http" | "https" | "mailto")
        }
        _ => true,
    }
}
