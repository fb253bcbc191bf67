use axum::extract::{Form, Path, State};
use axum::response::{Html, Redirect};
use axum::routing::{get, post};
use axum::Router;
use serde::Deserialize;

use crate::auth::middleware::{AdminStudent, CurrentStudent};
use crate::error::AppError;
use crate::services::{CourseService, MatchService, NewCourse, StudentService};
use crate::state::AppState;
use crate::views;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/dashboard", get(dashboard))
        .route("/enroll/{id}", post(enroll))
        .route("/add_course", post(add_course))
        .route("/admin", get(admin))
}

#[derive(Debug, Deserialize)]
pub struct CourseForm {
    pub course_name: Option<String>,
    pub instructor: Option<String>,
    pub image: Option<String>,
    pub link: Option<String>,
    pub description: Option<String>,
}

async fn dashboard(
    State(state): State<AppState>,
    CurrentStudent(student): CurrentStudent,
) -> Result<Html<String>, AppError> {
    let enrolled = CourseService::enrolled(&state.db, &student).await?;
    let catalogue = CourseService::list(&state.db).await?;
    let fixtures = MatchService::list_with_predictions(&state.db, student.id).await?;
    Ok(Html(views::dashboard(
        &student, &enrolled, &catalogue, &fixtures,
    )))
}

async fn enroll(
    State(state): State<AppState>,
    CurrentStudent(student): CurrentStudent,
    Path(course_id): Path<i32>,
) -> Result<Redirect, AppError> {
    CourseService::enroll(&state.db, student.id, course_id).await?;
    Ok(Redirect::to("/dashboard"))
}

async fn add_course(
    State(state): State<AppState>,
    AdminStudent(admin): AdminStudent,
    Form(form): Form<CourseForm>,
) -> Result<Redirect, AppError> {
    let course = NewCourse::from_form(
        form.course_name.as_deref(),
        form.instructor.as_deref(),
        form.image.as_deref(),
        form.link.as_deref(),
        form.description.as_deref(),
    )?;
    let created = CourseService::add(&state.db, course).await?;
    tracing::info!(admin_id = admin.id, course_id = created.id, "Course added by admin");
    Ok(Redirect::to("/admin"))
}

async fn admin(
    State(state): State<AppState>,
    AdminStudent(_admin): AdminStudent,
) -> Result<Html<String>, AppError> {
    let students = StudentService::list(&state.db).await?;
    let courses = CourseService::list(&state.db).await?;
    Ok(Html(views::admin_page(&students, &courses)))
}
