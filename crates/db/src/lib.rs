use std::str::FromStr;

use sqlx::{
    Error, SqlitePool,
    migrate::MigrateError,
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
};
use tracing::info;

pub mod models;

#[derive(Debug, thiserror::Error)]
pub enum DBServiceError {
    #[error("database error: {0}")]
    Database(#[from] Error),
    #[error("migration error: {0}")]
    Migrate(#[from] MigrateError),
}

/// Owns the SQLite pool. Cloned into every service and handler that touches storage.
#[derive(Clone)]
pub struct DBService {
    pub pool: SqlitePool,
}

impl DBService {
    /// Connects to `database_url` and applies pending migrations.
    pub async fn new(database_url: &str) -> Result<DBService, DBServiceError> {
        let options = SqliteConnectOptions::from_str(database_url)?
            .create_if_missing(true)
            .foreign_keys(true);
        let pool = SqlitePoolOptions::new().connect_with(options).await?;
        Self::from_pool(pool).await
    }

    /// Single-connection in-memory database, used by tests across the workspace.
    pub async fn new_in_memory() -> Result<DBService, DBServiceError> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await?;
        Self::from_pool(pool).await
    }

    async fn from_pool(pool: SqlitePool) -> Result<DBService, DBServiceError> {
        sqlx::migrate!("./migrations").run(&pool).await?;
        info!("Database migrations applied");
        Ok(DBService { pool })
    }
}
