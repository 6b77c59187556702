mod documents;
mod files;
mod system;

use crate::api::response::ApiError;
use crate::storage::DatabaseError;

pub use documents::{
    create_document, delete_document, list_documents, update_document, DeleteResponse,
    DocumentRequest, DocumentResponse,
};
pub use files::{download_document_file, upload_document_file};
pub use system::{diagnostics, root, DiagnosticsResponse, RootResponse};

/// Map a DatabaseError to an ApiError
fn storage_error(e: DatabaseError) -> ApiError {
    ApiError::internal(e.to_string())
}
