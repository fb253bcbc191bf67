#![allow(dead_code)]

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::header::{CONTENT_TYPE, COOKIE, LOCATION, SET_COOKIE};
use axum::http::{HeaderMap, Request, StatusCode};
use http_body_util::BodyExt;
use migration::{Migrator, MigratorTrait};
use tower::ServiceExt;

use pitchside::auth::google::{GoogleIdentity, IdTokenVerifier, VerifyError};
use pitchside::config::{Config, Environment};
use pitchside::state::AppState;

pub const ADMIN_EMAIL: &str = "coach@example.com";
pub const GOOGLE_CLIENT_ID: &str = "test-client.apps.googleusercontent.com";

/// Accepts a fixed set of tokens, each standing for one Google identity.
#[derive(Default)]
pub struct StaticVerifier {
    identities: HashMap<String, GoogleIdentity>,
}

impl StaticVerifier {
    pub fn with(mut self, token: &str, subject: &str, email: &str, name: Option<&str>) -> Self {
        self.identities.insert(
            token.to_string(),
            GoogleIdentity {
                subject: subject.to_string(),
                email: email.to_string(),
                name: name.map(str::to_string),
            },
        );
        self
    }
}

#[async_trait]
impl IdTokenVerifier for StaticVerifier {
    async fn verify(&self, token: &str) -> Result<GoogleIdentity, VerifyError> {
        self.identities
            .get(token)
            .cloned()
            .ok_or_else(|| VerifyError::InvalidToken("unknown test token".to_string()))
    }
}

pub fn test_config() -> Config {
    Config {
        database_url: String::new(),
        server_host: std::net::IpAddr::from([127, 0, 0, 1]),
        server_port: 0,
        environment: Environment::Development,
        log_level: "warn".to_string(),
        secret_key: "test-secret-key-for-testing-only-32chars".to_string(),
        session_ttl_secs: 3600,
        google_client_id: GOOGLE_CLIENT_ID.to_string(),
        admin_emails: vec![ADMIN_EMAIL.to_string()],
        matches_csv: PathBuf::from("does-not-exist.csv"),
    }
}

/// Build the app backed by an in-memory `SQLite` database with migrations applied.
pub async fn test_app_with(config: Config, verifier: StaticVerifier) -> (Router, AppState) {
    let db = sea_orm::Database::connect("sqlite::memory:")
        .await
        .unwrap_or_default();
    Migrator::up(&db, None).await.unwrap_or_default();

    let state = AppState {
        db,
        config,
        id_token_verifier: Arc::new(verifier),
    };

    let app = pitchside::routes::router().with_state(state.clone());
    (app, state)
}

pub async fn test_app() -> (Router, AppState) {
    test_app_with(test_config(), StaticVerifier::default()).await
}

/// Collected response parts.
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: String,
}

impl TestResponse {
    pub fn location(&self) -> Option<&str> {
        self.headers.get(LOCATION).and_then(|v| v.to_str().ok())
    }

    /// `session=<token>` pair from `Set-Cookie`, ready to send back as a `Cookie` header.
    pub fn session_cookie(&self) -> Option<String> {
        self.headers
            .get_all(SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .filter_map(|v| v.split(';').next())
            .find(|pair| pair.starts_with("session=") && pair.len() > "session=".len())
            .map(str::to_string)
    }
}

pub async fn send(app: &Router, request: Request<Body>) -> TestResponse {
    let response = app.clone().oneshot(request).await.unwrap_or_default();

    let status = response.status();
    let headers = response.headers().clone();
    let body = response
        .into_body()
        .collect()
        .await
        .map(http_body_util::Collected::to_bytes)
        .unwrap_or_default();

    TestResponse {
        status,
        headers,
        body: String::from_utf8(body.to_vec()).unwrap_or_default(),
    }
}

fn builder(method: &str, uri: &str, cookie: Option<&str>) -> axum::http::request::Builder {
    let builder = Request::builder().method(method).uri(uri);
    match cookie {
        Some(cookie) => builder.header(COOKIE, cookie),
        None => builder,
    }
}

pub async fn get(app: &Router, uri: &str, cookie: Option<&str>) -> TestResponse {
    let request = builder("GET", uri, cookie)
        .body(Body::empty())
        .unwrap_or_default();
    send(app, request).await
}

/// POST an `application/x-www-form-urlencoded` body. Callers encode the fields.
pub async fn post_form(app: &Router, uri: &str, body: &str, cookie: Option<&str>) -> TestResponse {
    let request = builder("POST", uri, cookie)
        .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .unwrap_or_default();
    send(app, request).await
}

pub async fn post_json(app: &Router, uri: &str, body: &serde_json::Value) -> TestResponse {
    let request = builder("POST", uri, None)
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap_or_default();
    send(app, request).await
}

/// POST a single multipart field holding `content`.
pub async fn post_multipart(app: &Router, uri: &str, field: &str, content: &str) -> TestResponse {
    let boundary = "pitchside-test-boundary";
    let body = format!(
        "--{boundary}\r\nContent-Disposition: form-data; name=\"{field}\"; filename=\"matches.csv\"\r\n\
         Content-Type: text/csv\r\n\r\n{content}\r\n--{boundary}--\r\n"
    );
    let request = builder("POST", uri, None)
        .header(
            CONTENT_TYPE,
            format!("multipart/form-data; boundary={boundary}"),
        )
        .body(Body::from(body))
        .unwrap_or_default();
    send(app, request).await
}

/// Register a student through `/register` and return the session cookie.
pub async fn register(app: &Router, name: &str, email: &str) -> String {
    let body = format!("name={name}&email={email}&password=correct-horse-battery");
    post_form(app, "/register", &body, None)
        .await
        .session_cookie()
        .unwrap_or_default()
}
