use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::config::AppConfig;

#[derive(Clone)]
pub struct AppState {
    pub orm: Arc<DatabaseConnection>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(orm: impl Into<Arc<DatabaseConnection>>, config: AppConfig) -> Self {
        Self {
            orm: orm.into(),
            config: Arc::new(config),
        }
    }

    pub fn db(&self) -> &DatabaseConnection {
        &self.orm
    }
}
