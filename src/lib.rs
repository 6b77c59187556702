//! scan-archive - Document metadata and file archive API
//!
//! Clients create document records, attach one file to each, search by title
//! or tag, update metadata, download the stored file and delete documents.
//! - redb embedded database for documents and inline file blobs
//! - REST API with multipart upload support
//! - Permissive CORS for browser clients

pub mod api;
pub mod config;
pub mod preview;
pub mod storage;
#[cfg(test)]
pub mod testutil;

use config::{Config, DatabaseTarget};
use storage::Database;

/// Shared application state
pub struct AppState {
    pub config: Config,
    /// `None` when DATABASE_URL is unset or the database could not be opened.
    pub db: Option<Database>,
}

impl AppState {
    pub fn new(config: Config, db: Option<Database>) -> Self {
        Self { config, db }
    }
}

/// Open the database named by the configuration. Failures are logged and
/// leave the service running without a database.
pub fn connect_database(config: &Config) -> Option<Database> {
    let target = match config.database_target()? {
        Ok(target) => target,
        Err(e) => {
            tracing::error!(error = %e, "Database not configured");
            return None;
        }
    };

    let opened = match &target {
        DatabaseTarget::Memory => Database::in_memory(),
        DatabaseTarget::File(path) => Database::open(path),
    };

    match opened {
        Ok(db) => {
            let db = match &config.database.name {
                Some(name) => db.with_name(name.as_str()),
                None => db,
            };
            tracing::info!(db_target = ?target, name = db.name(), "Database opened");
            Some(db)
        }
        Err(e) => {
            tracing::error!(error = %e, db_target = ?target, "Failed to open database");
            None
        }
    }
}
