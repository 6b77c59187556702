use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::AppState;

/// Number of table names listed by the diagnostics route.
const MAX_LISTED_COLLECTIONS: usize = 10;

// ============================================================================
// Types
// ============================================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct RootResponse {
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DiagnosticsResponse {
    pub backend: String,
    pub database: String,
    pub database_url: Option<String>,
    pub database_name: Option<String>,
    pub connection_status: String,
    pub collections: Vec<String>,
}

// ============================================================================
// Handlers
// ============================================================================

pub async fn root() -> Json<RootResponse> {
    Json(RootResponse {
        message: "Scan & Archive Backend Ready".to_string(),
    })
}

/// Connectivity report. Always 200; problems are described in the body.
pub async fn diagnostics(State(state): State<Arc<AppState>>) -> Json<DiagnosticsResponse> {
    let mut response = DiagnosticsResponse {
        backend: "✅ Running".to_string(),
        database: "❌ Not Available".to_string(),
        database_url: None,
        database_name: None,
        connection_status: "Not Connected".to_string(),
        collections: Vec::new(),
    };

    match &state.db {
        Some(db) => {
            let url_set = state.config.database.url.is_some();
            response.database = "✅ Available".to_string();
            response.database_url = Some(if url_set { "✅ Set" } else { "❌ Not Set" }.to_string());
            response.database_name = Some(db.name().to_string());
            response.connection_status = "Connected".to_string();

            match db.collection_names() {
                Ok(names) => {
                    response.collections = names.into_iter().take(MAX_LISTED_COLLECTIONS).collect();
                    response.database = "✅ Connected & Working".to_string();
                }
                Err(e) => {
                    let message: String = e.to_string().chars().take(50).collect();
                    response.database = format!("⚠️  Connected but Error: {message}");
                }
            }
        }
        None => {
            response.database = "⚠️  Available but not initialized".to_string();
        }
    }

    Json(response)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{test_state, test_state_without_db};

    #[tokio::test]
    async fn test_diagnostics_with_database() {
        let Json(report) = diagnostics(State(test_state())).await;
        assert_eq!(report.connection_status, "Connected");
        assert_eq!(report.database, "✅ Connected & Working");
        assert_eq!(report.database_url.as_deref(), Some("✅ Set"));
        assert_eq!(report.database_name.as_deref(), Some("memory"));
        assert!(report.collections.contains(&"document".to_string()));
        assert!(report.collections.contains(&"fileblob".to_string()));
    }

    #[tokio::test]
    async fn test_diagnostics_without_database() {
        let Json(report) = diagnostics(State(test_state_without_db())).await;
        assert_eq!(report.backend, "✅ Running");
        assert_eq!(report.connection_status, "Not Connected");
        assert_eq!(report.database, "⚠️  Available but not initialized");
        assert!(report.database_url.is_none());
        assert!(report.collections.is_empty());
    }

    #[tokio::test]
    async fn test_root_message() {
        let Json(body) = root().await;
        assert_eq!(body.message, "Scan & Archive Backend Ready");
    }
}
