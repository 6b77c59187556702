//! Shared test helpers for in-crate handler tests.

use std::sync::Arc;

use crate::config::{Config, DatabaseConfig};
use crate::storage::Database;
use crate::AppState;

/// Create a test AppState backed by an in-memory database.
pub fn test_state() -> Arc<AppState> {
    let config = Config {
        database: DatabaseConfig {
            url: Some("memory://".to_string()),
            name: None,
        },
        ..Config::default()
    };
    let db = Database::in_memory().expect("Failed to open in-memory database");
    Arc::new(AppState::new(config, Some(db)))
}

/// Create a test AppState with no database, as when DATABASE_URL is unset.
pub fn test_state_without_db() -> Arc<AppState> {
    Arc::new(AppState::new(Config::default(), None))
}
