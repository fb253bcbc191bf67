use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::auth::google::IdTokenVerifier;
use crate::config::Config;

/// Shared application state available to all request handlers via Axum's `State` extractor.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub config: Config,
    pub id_token_verifier: Arc<dyn IdTokenVerifier>,
}
