//! Database layer for hustings.

pub mod entities;
pub mod migrations;
pub mod repositories;
pub mod test_utils;

use hustings_common::{AppError, Config};
use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};
use std::time::Duration;
use tracing::log::LevelFilter;

/// Initialize database connection.
pub async fn init(config: &Config) -> Result<DatabaseConnection, AppError> {
    let mut opt = ConnectOptions::new(&config.database.url);

    opt.max_connections(config.database.max_connections)
        .min_connections(config.database.min_connections)
        .connect_timeout(Duration::from_secs(config.database.connect_timeout_secs))
        .acquire_timeout(Duration::from_secs(config.database.acquire_timeout_secs))
        .idle_timeout(Duration::from_secs(600))
        .max_lifetime(Duration::from_secs(1800))
        .sqlx_logging(true)
        .sqlx_logging_level(LevelFilter::Debug);

    Database::connect(opt)
        .await
        .map_err(|e| AppError::Database(e.to_string()))
}

/// Run pending migrations.
pub async fn migrate(db: &DatabaseConnection) -> Result<(), AppError> {
    use sea_orm_migration::MigratorTrait;
    migrations::Migrator::up(db, None)
        .await
        .map_err(|e| AppError::Database(e.to_string()))
}

/// Map a database error into the application taxonomy.
///
/// Waits that hit the pool or connection timeouts are surfaced as transient
/// so callers know the request may succeed on retry.
#[must_use]
pub fn map_db_err(err: DbErr) -> AppError {
    if matches!(err, DbErr::ConnectionAcquire(_) | DbErr::Conn(_)) {
        AppError::Transient(err.to_string())
    } else {
        AppError::Database(err.to_string())
    }
}
