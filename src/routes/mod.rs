mod accounts;
mod courses;
mod health;
mod matches;
mod players;

use axum::Router;

use crate::state::AppState;

/// Build the complete application router.
///
/// Structure:
/// - players: `/`, `/create`, `/dummy`, `/initdb`
/// - matches: `/initmatches`, `/dummymatches`, `/submit-prediction`
/// - accounts: `/register`, `/login`, `/logout`, `/auth/google`
/// - courses: `/dashboard`, `/enroll/{id}`, `/add_course`, `/admin`
/// - `GET /health` with database connectivity
pub fn router() -> Router<AppState> {
    Router::new()
        .merge(players::router())
        .merge(matches::router())
        .merge(accounts::router())
        .merge(courses::router())
        .merge(health::router())
}
