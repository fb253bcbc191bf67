use chrono::Utc;
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};

use crate::entities::{courses, enrollments, students};
use crate::error::AppError;
use crate::services::{check_length, is_web_url, non_blank};

const MAX_COURSE_NAME: usize = 200;
const MAX_INSTRUCTOR: usize = 100;
const MAX_URL: usize = 500;

/// Validated input for a new course.
#[derive(Debug, Clone, Default)]
pub struct NewCourse {
    pub course_name: String,
    pub instructor: Option<String>,
    pub image: Option<String>,
    pub link: Option<String>,
    pub description: Option<String>,
}

impl NewCourse {
    /// Build from raw form values.
    ///
    /// # Errors
    ///
    /// Returns `BadRequest` if `course_name` is missing or blank, a text field is too long,
    /// or `image` or `link` is not an `http(s)` URL.
    pub fn from_form(
        course_name: Option<&str>,
        instructor: Option<&str>,
        image: Option<&str>,
        link: Option<&str>,
        description: Option<&str>,
    ) -> Result<Self, AppError> {
        let course_name = non_blank(course_name).ok_or_else(|| {
            AppError::BadRequest("Missing required field: course_name".to_string())
        })?;
        let instructor = non_blank(instructor);
        let image = non_blank(image);
        let link = non_blank(link);

        check_length("course_name", &course_name, MAX_COURSE_NAME).map_err(AppError::BadRequest)?;
        if let Some(instructor) = &instructor {
            check_length("instructor", instructor, MAX_INSTRUCTOR).map_err(AppError::BadRequest)?;
        }
        for (field, url) in [("image", &image), ("link", &link)] {
            if let Some(url) = url {
                check_length(field, url, MAX_URL).map_err(AppError::BadRequest)?;
                if !is_web_url(url) {
                    return Err(AppError::BadRequest(format!(
                        "{field} must be an http:// or https:// URL."
                    )));
                }
            }
        }

        Ok(Self {
            course_name,
            instructor,
            image,
            link,
            description: non_blank(description),
        })
    }
}

pub struct CourseService;

impl CourseService {
    /// Full catalogue, alphabetical
    pub async fn list(db: &DatabaseConnection) -> Result<Vec<courses::Model>, AppError> {
        let rows = courses::Entity::find()
            .order_by_asc(courses::Column::CourseName)
            .order_by_asc(courses::Column::Id)
            .all(db)
            .await?;
        Ok(rows)
    }

    /// Courses the student is enrolled in
    pub async fn enrolled(
        db: &DatabaseConnection,
        student: &students::Model,
    ) -> Result<Vec<courses::Model>, AppError> {
        let rows = student
            .find_related(courses::Entity)
            .order_by_asc(courses::Column::CourseName)
            .all(db)
            .await?;
        Ok(rows)
    }

    pub async fn add(db: &DatabaseConnection, course: NewCourse) -> Result<courses::Model, AppError> {
        let model = courses::ActiveModel {
            course_name: Set(course.course_name),
            instructor: Set(course.instructor),
            image: Set(course.image),
            link: Set(course.link),
            description: Set(course.description),
            ..Default::default()
        };

        let created = model.insert(db).await?;
        tracing::info!(course_id = created.id, name = %created.course_name, "Course added");
        Ok(created)
    }

    /// Enroll a student in a course.
    ///
    /// Enrolling twice is a no-op: the pair is inserted with `ON CONFLICT DO NOTHING`, so
    /// concurrent requests cannot create duplicates either. Returns `true` if a new
    /// enrollment row was written.
    pub async fn enroll(
        db: &DatabaseConnection,
        student_id: i32,
        course_id: i32,
    ) -> Result<bool, AppError> {
        courses::Entity::find_by_id(course_id)
            .one(db)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("No course with id {course_id}.")))?;

        let enrollment = enrollments::ActiveModel {
            student_id: Set(student_id),
            course_id: Set(course_id),
            enrolled_at: Set(Utc::now().fixed_offset()),
        };

        let inserted = enrollments::Entity::insert(enrollment)
            .on_conflict(
                OnConflict::columns([
                    enrollments::Column::StudentId,
                    enrollments::Column::CourseId,
                ])
                .do_nothing()
                .to_owned(),
            )
            .exec_without_returning(db)
            .await?;

        if inserted > 0 {
            tracing::info!(student_id, course_id, "Student enrolled");
        } else {
            tracing::debug!(student_id, course_id, "Student already enrolled");
        }
        Ok(inserted > 0)
    }

    /// Number of enrollment rows for a course
    pub async fn enrollment_count(db: &DatabaseConnection, course_id: i32) -> Result<u64, AppError> {
        let count = enrollments::Entity::find()
            .filter(enrollments::Column::CourseId.eq(course_id))
            .count(db)
            .await?;
        Ok(count)
    }
}
