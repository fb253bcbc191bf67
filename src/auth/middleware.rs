use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use sea_orm::EntityTrait;

use crate::auth::session;
use crate::entities::students;
use crate::error::AppError;
use crate::state::AppState;

/// Logged-in student extracted from the session cookie.
///
/// Requests without a valid session are redirected to `/login`:
/// ```ignore
/// async fn handler(CurrentStudent(student): CurrentStudent) -> impl IntoResponse { ... }
/// ```
#[derive(Debug, Clone)]
pub struct CurrentStudent(pub students::Model);

impl FromRequestParts<AppState> for CurrentStudent {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = session::session_token(&parts.headers).ok_or(AppError::LoginRequired)?;

        let claims = session::validate_session_token(token, &state.config.secret_key)
            .map_err(|e| {
                tracing::debug!("Rejected session cookie: {e:#}");
                AppError::LoginRequired
            })?;

        let student_id = claims.student_id().ok_or(AppError::LoginRequired)?;

        // A valid cookie for a student that no longer exists is treated as logged out
        let student = students::Entity::find_by_id(student_id)
            .one(&state.db)
            .await
            .map_err(|e| AppError::Internal(e.into()))?
            .ok_or(AppError::LoginRequired)?;

        Ok(Self(student))
    }
}

/// Requires the logged-in student's email to be listed in `ADMIN_EMAILS`.
#[derive(Debug, Clone)]
pub struct AdminStudent(pub students::Model);

impl FromRequestParts<AppState> for AdminStudent {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let CurrentStudent(student) = CurrentStudent::from_request_parts(parts, state).await?;

        if !state.config.is_admin_email(&student.email) {
            tracing::warn!(student_id = student.id, "Non-admin attempted admin access");
            return Err(AppError::Forbidden(
                "Administrator access required.".to_string(),
            ));
        }

        Ok(Self(student))
    }
}
