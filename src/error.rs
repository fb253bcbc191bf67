use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Redirect, Response};

use crate::views;

/// Unified application error type that maps to HTML error pages.
///
/// Every variant renders `<h1>title</h1><p>message</p>` with the matching status, except
/// `LoginRequired`, which sends the browser to the login form.
#[derive(Debug)]
pub enum AppError {
    /// 400 Bad Request
    BadRequest(String),
    /// 401 Unauthorized
    Unauthorized(String),
    /// 403 Forbidden
    Forbidden(String),
    /// 404 Not Found
    NotFound(String),
    /// 409 Conflict
    Conflict(String),
    /// 422 Unprocessable Entity
    UnprocessableEntity(String),
    /// 303 See Other to `/login`
    LoginRequired,
    /// 500 Internal Server Error (wraps any error, logs details, returns generic message)
    Internal(anyhow::Error),
}

impl AppError {
    /// Status code this error is reported with.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::UnprocessableEntity(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::LoginRequired => StatusCode::SEE_OTHER,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let (title, message) = match self {
            Self::LoginRequired => return Redirect::to("/login").into_response(),
            Self::BadRequest(msg) => ("Invalid request", msg),
            Self::Unauthorized(msg) => ("Authentication failed", msg),
            Self::Forbidden(msg) => ("Access denied", msg),
            Self::NotFound(msg) => ("Not found", msg),
            Self::Conflict(msg) => ("Already exists", msg),
            Self::UnprocessableEntity(msg) => ("Unavailable", msg),
            Self::Internal(err) => {
                tracing::error!("Internal server error: {err:#}");
                ("Something went wrong", "An internal error occurred".to_string())
            }
        };

        (status, Html(views::error_page(title, &message))).into_response()
    }
}

/// Allow `?` to automatically convert any `anyhow::Error` into `AppError::Internal`.
impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self::Internal(err.into())
    }
}
