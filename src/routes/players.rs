use axum::extract::{Form, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Redirect};
use axum::routing::get;
use axum::Router;
use migration::{Migrator, MigratorTrait};
use serde::Deserialize;

use crate::error::AppError;
use crate::services::{NewPlayer, PlayerService};
use crate::state::AppState;
use crate::views;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(index))
        .route("/create", get(create_form).post(create))
        .route("/dummy", get(add_dummy))
        .route("/initdb", get(init_db))
}

/// Every field is optional at the extractor level so that a missing `name` surfaces as our
/// own 400 page rather than a deserialization rejection.
#[derive(Debug, Deserialize)]
pub struct PlayerForm {
    pub name: Option<String>,
    pub position: Option<String>,
    pub team: Option<String>,
    pub jersey_number: Option<String>,
}

async fn index(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    let players = PlayerService::list(&state.db).await?;
    Ok(Html(views::players_index(&players)))
}

async fn create_form() -> Html<String> {
    Html(views::create_player_form())
}

async fn create(
    State(state): State<AppState>,
    Form(form): Form<PlayerForm>,
) -> Result<Redirect, AppError> {
    let player = NewPlayer::from_form(
        form.name.as_deref(),
        form.position.as_deref(),
        form.team.as_deref(),
        form.jersey_number.as_deref(),
    )?;
    PlayerService::create(&state.db, player).await?;
    Ok(Redirect::to("/"))
}

async fn add_dummy(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let player = PlayerService::add_dummy(&state.db).await?;
    Ok((StatusCode::CREATED, Html(views::dummy_player_added(&player))))
}

/// Apply pending migrations, then seed sample players into an empty table.
async fn init_db(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    Migrator::up(&state.db, None).await?;
    let seeded = PlayerService::seed_samples(&state.db).await?;
    Ok(Html(views::initdb_done(seeded)))
}
