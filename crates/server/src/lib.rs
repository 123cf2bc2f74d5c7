pub mod config;
pub mod error;
pub mod routes;

use std::sync::Arc;

use db::DBService;
use services::services::form_schema::FormSchemaService;

use crate::config::ServerConfig;

/// Shared handler state, constructed once in `main` and cloned into every request.
#[derive(Clone)]
pub struct AppState {
    db: DBService,
    config: Arc<ServerConfig>,
}

impl AppState {
    pub fn new(db: DBService, config: ServerConfig) -> Self {
        Self {
            db,
            config: Arc::new(config),
        }
    }

    pub fn db(&self) -> &DBService {
        &self.db
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    pub fn form_schema(&self) -> FormSchemaService {
        FormSchemaService::new(self.db.pool.clone(), self.config.merge_policy)
    }
}
