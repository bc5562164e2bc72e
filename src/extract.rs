//! Extractors whose rejections speak the error format of their surface.

use axum::{
    extract::{rejection::PathRejection, FromRequest, FromRequestParts},
    response::{IntoResponse, Response},
};

use crate::{res, AppError};

/// JSON body; anything that fails to deserialize is a 422.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct ApiJson<T>(pub T);

/// Path parameters; an id that does not parse is a 404.
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(AppError))]
pub struct ApiPath<T>(pub T);

/// Path parameters of the HTML pages; an id that does not parse gets the
/// sorry page instead of a JSON body.
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(PageNotFound))]
pub struct PagePath<T>(pub T);

pub struct PageNotFound;

impl From<PathRejection> for PageNotFound {
    fn from(rejection: PathRejection) -> Self {
        tracing::debug!(%rejection, "unmatched page path");
        Self
    }
}

impl IntoResponse for PageNotFound {
    fn into_response(self) -> Response {
        res::sorry("page").into_response()
    }
}
