use axum::extract::{Form, Multipart, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::routing::{get, post};
use axum::Router;
use serde::Deserialize;

use crate::auth::middleware::CurrentStudent;
use crate::error::AppError;
use crate::import::{self, ImportReport};
use crate::services::MatchService;
use crate::state::AppState;
use crate::views;

/// Multipart field carrying the uploaded CSV.
const UPLOAD_FIELD: &str = "file";

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/initmatches", get(import_from_file).post(import_upload))
        .route("/dummymatches", get(add_dummy_matches))
        .route("/submit-prediction", post(submit_prediction))
}

/// Fields are optional so that an incomplete form gets our 400 page, not a rejection.
#[derive(Debug, Deserialize)]
pub struct PredictionForm {
    pub match_id: Option<String>,
    pub outcome: Option<String>,
}

fn report_response(report: &ImportReport) -> Response {
    let status = if report.is_complete() {
        StatusCode::OK
    } else {
        StatusCode::MULTI_STATUS
    };
    (status, Html(views::import_report(report))).into_response()
}

/// Import the fixture file configured by `MATCHES_CSV`.
async fn import_from_file(State(state): State<AppState>) -> Result<Response, AppError> {
    let path = &state.config.matches_csv;
    let input = match tokio::fs::read(path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(AppError::NotFound(format!(
                "Fixture file {} does not exist.",
                path.display()
            )));
        }
        Err(e) => return Err(AppError::Internal(e.into())),
    };

    tracing::info!(path = %path.display(), "Importing matches from file");
    let report = import::import_matches(&state.db, &input).await?;
    Ok(report_response(&report))
}

/// Import an uploaded CSV sent as multipart field `file`.
async fn import_upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Response, AppError> {
    let mut upload = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.body_text()))?
    {
        if field.name() == Some(UPLOAD_FIELD) {
            let bytes = field
                .bytes()
                .await
                .map_err(|e| AppError::BadRequest(e.body_text()))?;
            upload = Some(bytes);
            break;
        }
    }

    let input = upload.ok_or_else(|| {
        AppError::BadRequest(format!("Missing upload field: {UPLOAD_FIELD}"))
    })?;

    let report = import::import_matches(&state.db, &input).await?;
    Ok(report_response(&report))
}

async fn add_dummy_matches(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let inserted = MatchService::add_dummy_matches(&state.db).await?;
    Ok((StatusCode::CREATED, Html(views::dummy_matches_added(inserted))))
}

async fn submit_prediction(
    State(state): State<AppState>,
    CurrentStudent(student): CurrentStudent,
    Form(form): Form<PredictionForm>,
) -> Result<Redirect, AppError> {
    let raw_id = form
        .match_id
        .ok_or_else(|| AppError::BadRequest("Missing required field: match_id".to_string()))?;
    let outcome = form
        .outcome
        .ok_or_else(|| AppError::BadRequest("Missing required field: outcome".to_string()))?;
    let match_id = raw_id
        .trim()
        .parse::<i32>()
        .map_err(|_| AppError::BadRequest(format!("Invalid match id {raw_id:?}.")))?;

    MatchService::submit_prediction(&state.db, student.id, match_id, &outcome).await?;
    Ok(Redirect::to("/dashboard"))
}
