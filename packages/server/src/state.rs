use std::sync::Arc;

use common::media::MediaStore;
use sea_orm::DatabaseConnection;

use crate::config::AppConfig;

/// Shared application state, built once in `main` and injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub media: Arc<MediaStore>,
    pub config: AppConfig,
}
