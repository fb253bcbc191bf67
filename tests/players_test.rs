mod common;

use axum::http::StatusCode;
use sea_orm::{EntityTrait, PaginatorTrait};

use pitchside::entities::players;

#[tokio::test]
async fn index_lists_created_players() {
    let (app, _state) = common::test_app().await;

    let created = common::post_form(
        &app,
        "/create",
        "name=Kylian+Mbappe&position=Forward&team=France&jersey_number=10",
        None,
    )
    .await;
    assert_eq!(created.status, StatusCode::SEE_OTHER);
    assert_eq!(created.location(), Some("/"));

    let index = common::get(&app, "/", None).await;
    assert_eq!(index.status, StatusCode::OK);
    assert!(index.body.contains("Kylian Mbappe"));
    assert!(index.body.contains("France"));
}

#[tokio::test]
async fn blank_jersey_number_is_stored_as_null() -> anyhow::Result<()> {
    let (app, state) = common::test_app().await;

    let response =
        common::post_form(&app, "/create", "name=Trainee&position=&team=&jersey_number=", None)
            .await;
    assert_eq!(response.status, StatusCode::SEE_OTHER);

    let rows = players::Entity::find().all(&state.db).await?;
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].name, "Trainee");
    assert_eq!(rows[0].jersey_number, None);
    assert_eq!(rows[0].position, None);
    assert_eq!(rows[0].team, None);
    Ok(())
}

#[tokio::test]
async fn missing_name_is_rejected_without_insert() -> anyhow::Result<()> {
    let (app, state) = common::test_app().await;

    let response = common::post_form(&app, "/create", "position=Goalkeeper", None).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert!(response.body.contains("Missing required field: name"));

    let blank = common::post_form(&app, "/create", "name=+++", None).await;
    assert_eq!(blank.status, StatusCode::BAD_REQUEST);

    assert_eq!(players::Entity::find().count(&state.db).await?, 0);
    Ok(())
}

#[tokio::test]
async fn dummy_inserts_placeholder_player() -> anyhow::Result<()> {
    let (app, state) = common::test_app().await;

    let response = common::get(&app, "/dummy", None).await;
    assert_eq!(response.status, StatusCode::CREATED);
    assert!(response.body.contains("Dummy Player"));

    let rows = players::Entity::find().all(&state.db).await?;
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].team.as_deref(), Some("Test Team"));
    assert_eq!(rows[0].jersey_number, Some(99));
    Ok(())
}

#[tokio::test]
async fn initdb_seeds_only_an_empty_table() -> anyhow::Result<()> {
    let (app, state) = common::test_app().await;

    let first = common::get(&app, "/initdb", None).await;
    assert_eq!(first.status, StatusCode::OK);
    assert!(first.body.contains("Inserted 4 sample players"));
    assert_eq!(players::Entity::find().count(&state.db).await?, 4);

    let second = common::get(&app, "/initdb", None).await;
    assert_eq!(second.status, StatusCode::OK);
    assert!(second.body.contains("already contains players"));
    assert_eq!(players::Entity::find().count(&state.db).await?, 4);
    Ok(())
}

#[tokio::test]
async fn player_names_are_escaped() {
    let (app, _state) = common::test_app().await;

    common::post_form(&app, "/create", "name=%3Cscript%3Ex%3C%2Fscript%3E", None).await;

    let index = common::get(&app, "/", None).await;
    assert!(!index.body.contains("<script>x</script>"));
    assert!(index.body.contains("&lt;script&gt;"));
}

#[tokio::test]
async fn over_long_name_is_rejected_without_insert() -> anyhow::Result<()> {
    let (app, state) = common::test_app().await;

    let body = format!("name={}&team=Santos", "x".repeat(300));
    let response = common::post_form(&app, "/create", &body, None).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert!(response.body.contains("at most 100 characters"));

    assert_eq!(players::Entity::find().count(&state.db).await?, 0);
    Ok(())
}
