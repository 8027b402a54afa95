use std::sync::Arc;

use kernel::database::Database;
use shared::config::AppConfig;

pub mod model;
pub mod postgres;
pub mod sqlite;

use crate::database::{postgres::PostgresDatabase, sqlite::SqliteDatabase};

/// Builds the storage backend selected by configuration. The choice is
/// made once at startup; everything above this point is storage-agnostic.
pub fn database_from_config(config: &AppConfig) -> Arc<dyn Database> {
    if config.general.use_postgres {
        Arc::new(PostgresDatabase::new(&config.postgres))
    } else {
        Arc::new(SqliteDatabase::new(&config.sqlite.path))
    }
}
