pub mod course_service;
pub mod match_service;
pub mod player_service;
pub mod student_service;

pub use course_service::{CourseService, NewCourse};
pub use match_service::{FixtureWithPrediction, MatchService};
pub use player_service::{NewPlayer, PlayerService};
pub use student_service::StudentService;

use sea_orm::{DbErr, SqlErr};

/// Whether a database error is a unique-constraint violation.
pub(crate) fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}

/// Trim a submitted form value, mapping blank input to `None`.
#[must_use]
pub fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Reject a value longer than its column allows. Lengths count characters, as `varchar(n)` does.
///
/// # Errors
///
/// Returns a message naming the field and its limit.
pub fn check_length(field: &str, value: &str, max: usize) -> Result<(), String> {
    if value.chars().count() > max {
        return Err(format!("{field} must be at most {max} characters."));
    }
    Ok(())
}

/// Whether a URL uses the `http` or `https` scheme, the only ones rendered as links.
#[must_use]
pub fn is_web_url(url: &str) -> bool {
    let url = url.trim_start().to_ascii_lowercase();
    url.starts_with("http://") || url.starts_with("https://")
}

/// Cut a value down to at most `max` characters.
#[must_use]
pub fn truncate_chars(value: &str, max: usize) -> String {
    value.chars().take(max).collect()
}
