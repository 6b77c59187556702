use axum::Json;
use serde::{Deserialize, Serialize};

use super::storage_error;
use crate::api::response::{ApiError, AppJson, AppQuery, DocIdPath, Store};
use crate::storage::models::{DocumentFields, DocumentRecord};

// ============================================================================
// Types
// ============================================================================

/// Body of create and update requests.
#[derive(Debug, Deserialize, Serialize)]
pub struct DocumentRequest {
    pub title: String,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl From<DocumentRequest> for DocumentFields {
    fn from(req: DocumentRequest) -> Self {
        DocumentFields {
            title: req.title,
            tags: req.tags.unwrap_or_default(),
            notes: req.notes,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DocumentResponse {
    pub id: String,
    pub title: String,
    pub tags: Vec<String>,
    pub notes: Option<String>,
    pub mime_type: Option<String>,
    pub size: Option<u64>,
    pub text_preview: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<&DocumentRecord> for DocumentResponse {
    fn from(doc: &DocumentRecord) -> Self {
        DocumentResponse {
            id: doc.id.to_string(),
            title: doc.title.clone(),
            tags: doc.tags.clone(),
            notes: doc.notes.clone(),
            mime_type: doc.mime_type.clone(),
            size: doc.size,
            text_preview: doc.text_preview.clone(),
            created_at: doc.created_at.to_rfc3339(),
            updated_at: doc.updated_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ListDocumentsParams {
    #[serde(default)]
    pub q: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DeleteResponse {
    pub status: String,
}

// ============================================================================
// Handlers
// ============================================================================

pub async fn create_document(
    Store(db): Store,
    AppJson(req): AppJson<DocumentRequest>,
) -> Result<Json<DocumentResponse>, ApiError> {
    let doc = db.create_document(req.into()).map_err(storage_error)?;

    tracing::debug!(doc_id = %doc.id, "Created document");
    Ok(Json(DocumentResponse::from(&doc)))
}

pub async fn list_documents(
    Store(db): Store,
    AppQuery(params): AppQuery<ListDocumentsParams>,
) -> Result<Json<Vec<DocumentResponse>>, ApiError> {
    let docs = db
        .list_documents(params.q.as_deref())
        .map_err(storage_error)?;

    Ok(Json(docs.iter().map(DocumentResponse::from).collect()))
}

pub async fn update_document(
    Store(db): Store,
    DocIdPath(id): DocIdPath,
    AppJson(req): AppJson<DocumentRequest>,
) -> Result<Json<DocumentResponse>, ApiError> {
    let doc = db
        .update_document(&id, req.into())
        .map_err(storage_error)?
        .ok_or_else(|| ApiError::not_found("Document not found"))?;

    tracing::debug!(doc_id = %id, "Updated document");
    Ok(Json(DocumentResponse::from(&doc)))
}

pub async fn delete_document(
    Store(db): Store,
    DocIdPath(id): DocIdPath,
) -> Result<Json<DeleteResponse>, ApiError> {
    if !db.delete_document(&id).map_err(storage_error)? {
        return Err(ApiError::not_found("Document not found"));
    }

    tracing::debug!(doc_id = %id, "Deleted document");
    Ok(Json(DeleteResponse {
        status: "deleted".to_string(),
    }))
}
