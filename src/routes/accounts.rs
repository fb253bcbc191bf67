use axum::extract::{Form, FromRequest, Request, State};
use axum::http::header::{CONTENT_TYPE, SET_COOKIE};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};

use crate::auth::google::VerifyError;
use crate::auth::session;
use crate::error::AppError;
use crate::services::StudentService;
use crate::state::AppState;
use crate::views;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register", get(register_form).post(register))
        .route("/login", get(login_form).post(login))
        .route("/logout", post(logout))
        .route("/auth/google", post(google_sign_in))
}

#[derive(Debug, Deserialize)]
pub struct RegisterForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Body of `POST /auth/google`, sent as JSON by scripts or as a form by the Google button.
#[derive(Debug, Deserialize)]
pub struct GoogleCredential {
    #[serde(default)]
    pub credential: String,
}

#[derive(Debug, Serialize)]
pub struct GoogleSignInResponse {
    pub success: bool,
    pub redirect: &'static str,
}

async fn register_form() -> Html<String> {
    Html(views::register_form(None, "", ""))
}

/// Validation failures re-render the form with the submitted name and email.
async fn register(
    State(state): State<AppState>,
    Form(form): Form<RegisterForm>,
) -> Result<Response, AppError> {
    match StudentService::register(&state.db, &form.name, &form.email, &form.password).await {
        Ok(student) => {
            let headers = session::login_headers(student.id, &state.config)?;
            Ok((headers, Redirect::to("/dashboard")).into_response())
        }
        Err(AppError::BadRequest(msg)) => Ok(register_error(StatusCode::BAD_REQUEST, &msg, &form)),
        Err(AppError::Conflict(msg)) => Ok(register_error(StatusCode::CONFLICT, &msg, &form)),
        Err(err) => Err(err),
    }
}

fn register_error(status: StatusCode, message: &str, form: &RegisterForm) -> Response {
    (
        status,
        Html(views::register_form(Some(message), &form.name, &form.email)),
    )
        .into_response()
}

async fn login_form(State(state): State<AppState>) -> Html<String> {
    Html(views::login_form(None, &state.config.google_client_id))
}

async fn login(
    State(state): State<AppState>,
    Form(form): Form<LoginForm>,
) -> Result<Response, AppError> {
    match StudentService::authenticate(&state.db, &form.email, &form.password).await {
        Ok(student) => {
            tracing::info!(student_id = student.id, "Student logged in");
            let headers = session::login_headers(student.id, &state.config)?;
            Ok((headers, Redirect::to("/dashboard")).into_response())
        }
        Err(AppError::Unauthorized(msg)) => Ok((
            StatusCode::UNAUTHORIZED,
            Html(views::login_form(Some(&msg), &state.config.google_client_id)),
        )
            .into_response()),
        Err(err) => Err(err),
    }
}

async fn logout() -> impl IntoResponse {
    let mut headers = HeaderMap::new();
    headers.insert(SET_COOKIE, session::clear_session_cookie());
    (headers, Redirect::to("/login"))
}

fn is_json(headers: &HeaderMap) -> bool {
    headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.starts_with("application/json"))
}

/// Sign in with a Google ID token.
///
/// JSON callers get `{"success": true, "redirect": "/dashboard"}`; the Google button's form
/// post is redirected straight to the dashboard. Both carry the session cookie.
async fn google_sign_in(
    State(state): State<AppState>,
    request: Request,
) -> Result<Response, AppError> {
    if state.config.google_client_id.is_empty() {
        return Err(AppError::UnprocessableEntity(
            "Google sign-in is not configured.".to_string(),
        ));
    }

    let wants_json = is_json(request.headers());
    let credential = if wants_json {
        let Json(body) = Json::<GoogleCredential>::from_request(request, &state)
            .await
            .map_err(|e| AppError::BadRequest(e.body_text()))?;
        body.credential
    } else {
        let Form(body) = Form::<GoogleCredential>::from_request(request, &state)
            .await
            .map_err(|e| AppError::BadRequest(e.body_text()))?;
        body.credential
    };

    if credential.trim().is_empty() {
        return Err(AppError::BadRequest("Missing credential.".to_string()));
    }

    let identity = match state.id_token_verifier.verify(credential.trim()).await {
        Ok(identity) => identity,
        Err(VerifyError::InvalidToken(reason)) => {
            tracing::warn!(%reason, "Rejected Google credential");
            return Err(AppError::Unauthorized(
                "Google sign-in failed: the credential could not be verified.".to_string(),
            ));
        }
        Err(err @ VerifyError::KeyFetch(_)) => return Err(AppError::Internal(err.into())),
    };

    let student = StudentService::sign_in_with_google(&state.db, &identity).await?;
    tracing::info!(student_id = student.id, "Student signed in with Google");
    let headers = session::login_headers(student.id, &state.config)?;

    if wants_json {
        let body = GoogleSignInResponse {
            success: true,
            redirect: "/dashboard",
        };
        Ok((headers, Json(body)).into_response())
    } else {
        Ok((headers, Redirect::to("/dashboard")).into_response())
    }
}
