pub mod entities;
pub mod migrator;
pub mod repositories;

use std::time::Duration;

use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use tracing::info;

/// Database configuration
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// Database URL (e.g., "sqlite://./complaint-desk.db?mode=rwc")
    pub url: String,
    pub max_connections: u32,
}

pub const DEFAULT_DATABASE_URL: &str = "sqlite://./complaint-desk.db?mode=rwc";

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_DATABASE_URL.to_string(),
            max_connections: 10,
        }
    }
}

/// Initialize the connection pool
pub async fn init_database(config: &DatabaseConfig) -> Result<DatabaseConnection, sea_orm::DbErr> {
    info!("Connecting to database: {}", config.url);

    let mut options = ConnectOptions::new(config.url.clone());
    options
        .max_connections(config.max_connections.max(1))
        .connect_timeout(Duration::from_secs(10))
        .sqlx_logging(false);

    let db = Database::connect(options).await?;
    info!("Database connected successfully");
    Ok(db)
}

/// Fresh in-memory database with the schema applied
#[cfg(test)]
pub(crate) async fn test_connection() -> DatabaseConnection {
    use sea_orm_migration::MigratorTrait;

    // One connection, otherwise every pooled connection sees its own empty database
    let db = init_database(&DatabaseConfig {
        url: "sqlite::memory:".to_string(),
        max_connections: 1,
    })
    .await
    .expect("in-memory database");
    migrator::Migrator::up(&db, None).await.expect("migrations");
    db
}
