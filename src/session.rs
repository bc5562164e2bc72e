//! Request-scoped identity. [`load_current_user`] resolves the session once per
//! request; handlers ask for [`CurrentUser`] (or `Option<CurrentUser>`).

use std::convert::Infallible;

use axum::{
    extract::{FromRequestParts, OptionalFromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};
use tower_sessions::Session;

use crate::{
    db::{DbError, Repository, User},
    AppError, AppResult,
};

pub const USER_ID: &str = "user_id";

#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

pub async fn load_current_user(
    State(repo): State<Repository>,
    session: Session,
    mut request: Request,
    next: Next,
) -> AppResult<Response> {
    if let Some(user_id) = session.get::<i64>(USER_ID).await? {
        match repo.find_user(user_id).await {
            Ok(user) => {
                request.extensions_mut().insert(CurrentUser(user));
            }
            Err(DbError::NotFound(_)) => {
                tracing::warn!(user_id, "session points at a missing user");
                session.remove::<i64>(USER_ID).await?;
            }
            Err(err) => return Err(err.into()),
        }
    }

    Ok(next.run(request).await)
}

pub async fn log_in(session: &Session, user: &User) -> AppResult<()> {
    session.cycle_id().await?;
    session.insert(USER_ID, user.id).await?;
    tracing::info!(user_id = user.id, "welcome @{}", user.username);
    Ok(())
}

impl<S: Send + Sync> FromRequestParts<S> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CurrentUser>()
            .cloned()
            .ok_or(AppError::Unauthorized)
    }
}

impl<S: Send + Sync> OptionalFromRequestParts<S> for CurrentUser {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Option<Self>, Self::Rejection> {
        Ok(parts.extensions.get::<CurrentUser>().cloned())
    }
}
