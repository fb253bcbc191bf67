mod common;

use axum::http::StatusCode;

#[tokio::test]
async fn health_reports_connected_database() {
    let (app, _state) = common::test_app().await;

    let response = common::get(&app, "/health", None).await;
    assert_eq!(response.status, StatusCode::OK);

    let json: serde_json::Value = serde_json::from_str(&response.body).unwrap_or_default();
    assert_eq!(json["status"], "ok");
    assert_eq!(json["version"], env!("CARGO_PKG_VERSION"));
    assert_eq!(json["database"]["connected"], true);
}

#[tokio::test]
async fn unknown_route_returns_404() {
    let (app, _state) = common::test_app().await;
    let response = common::get(&app, "/nonexistent", None).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}
