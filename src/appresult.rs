use axum::{
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::db::DbError;

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Unauthorized")]
    Unauthorized,
    #[error("Couldn't find {0}")]
    NotFound(&'static str),
    #[error("{}", .0.join(", "))]
    Invalid(Vec<String>),
    #[error("Not implemented")]
    NotImplemented,
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let errors = |status: StatusCode, errors: Vec<String>| {
            (status, Json(json!({ "status": "error", "errors": errors }))).into_response()
        };

        match self {
            Self::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                Json(json!({ "error": "Unauthorized" })),
            )
                .into_response(),
            Self::NotFound(_) => errors(StatusCode::NOT_FOUND, vec![self.to_string()]),
            Self::Invalid(messages) => errors(StatusCode::UNPROCESSABLE_ENTITY, messages),
            Self::NotImplemented => errors(StatusCode::NOT_IMPLEMENTED, vec![self.to_string()]),
            Self::Internal(err) => {
                tracing::error!("{err}\n\n{}", err.backtrace());
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
            }
        }
    }
}

impl From<DbError> for AppError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::Invalid(messages) => Self::Invalid(messages),
            DbError::NotFound(what) => Self::NotFound(what),
            DbError::Sqlx(err) => Self::Internal(err.into()),
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        Self::Invalid(vec![rejection.body_text()])
    }
}

impl From<PathRejection> for AppError {
    fn from(_: PathRejection) -> Self {
        Self::NotFound("record")
    }
}

macro_rules! apperr_impl {
    ($E:ty) => {
        impl From<$E> for AppError {
            fn from(err: $E) -> Self {
                Self::Internal(anyhow::Error::from(err))
            }
        }
    };
}

apperr_impl!(sqlx::Error);
apperr_impl!(serde_json::Error);
apperr_impl!(tower_sessions::session::Error);
apperr_impl!(axum::Error);
