use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use bytes::Bytes;

use super::documents::DocumentResponse;
use super::storage_error;
use crate::api::response::{ApiError, AppMultipart, DocIdPath, Store};
use crate::preview;
use crate::storage::models::NewFile;

/// Attach a file to a document.
/// Route: POST /api/documents/:id/upload (multipart, field `file`)
pub async fn upload_document_file(
    Store(db): Store,
    DocIdPath(id): DocIdPath,
    AppMultipart(mut multipart): AppMultipart,
) -> Result<Json<DocumentResponse>, ApiError> {
    if db.get_document(&id).map_err(storage_error)?.is_none() {
        return Err(ApiError::not_found("Document not found"));
    }

    let mut upload: Option<NewFile> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(format!("Invalid multipart data: {e}")))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let filename = field.file_name().map(|s| s.to_string());
        let content_type = field.content_type().map(|s| s.to_string()).or_else(|| {
            filename
                .as_deref()
                .and_then(|n| mime_guess::from_path(n).first())
                .map(|m| m.to_string())
        });

        let content = field
            .bytes()
            .await
            .map_err(|e| ApiError::bad_request(format!("Failed to read file: {e}")))?;

        upload = Some(NewFile {
            text_preview: preview::preview_for(content_type.as_deref(), &content),
            filename,
            content_type,
            content: content.to_vec(),
        });
    }

    let file = upload.ok_or_else(|| ApiError::unprocessable("file field is required"))?;
    let size = file.content.len();

    let doc = db
        .attach_file(&id, file)
        .map_err(storage_error)?
        .ok_or_else(|| ApiError::not_found("Document not found"))?;

    tracing::debug!(doc_id = %id, size, "Attached file");
    Ok(Json(DocumentResponse::from(&doc)))
}

/// Stream a document's file back to the client.
/// Route: GET /api/documents/:id/download
pub async fn download_document_file(
    Store(db): Store,
    DocIdPath(id): DocIdPath,
) -> Result<Response, ApiError> {
    let blob_id = db
        .get_document(&id)
        .map_err(storage_error)?
        .and_then(|doc| doc.file_blob_id)
        .ok_or_else(|| ApiError::not_found("File not found for this document"))?;

    let blob = db
        .get_file_blob(&blob_id)
        .map_err(storage_error)?
        .ok_or_else(|| ApiError::not_found("File blob missing"))?;

    let size = blob.content.len();
    let mut response = (StatusCode::OK, Bytes::from(blob.content)).into_response();
    let headers = response.headers_mut();

    headers.insert(
        header::CONTENT_TYPE,
        blob.record
            .content_type
            .as_deref()
            .and_then(|ct| HeaderValue::from_str(ct).ok())
            .unwrap_or(HeaderValue::from_static("application/octet-stream")),
    );

    headers.insert(header::CONTENT_LENGTH, HeaderValue::from(size));

    let disposition = content_disposition(blob.record.filename.as_deref().unwrap_or("file"));
    if let Ok(value) = HeaderValue::from_str(&disposition) {
        headers.insert(header::CONTENT_DISPOSITION, value);
    } else {
        headers.insert(
            header::CONTENT_DISPOSITION,
            HeaderValue::from_static("attachment; filename=\"file\""),
        );
    }

    Ok(response)
}

/// `attachment` disposition with an ASCII-safe `filename` and the full
/// name percent-encoded in `filename*`.
fn content_disposition(filename: &str) -> String {
    let cleaned: String = filename
        .chars()
        .filter(|c| !c.is_control() && *c != '"' && *c != '\\')
        .collect();
    let ascii_name: String = cleaned
        .chars()
        .filter(|c| c.is_ascii_graphic() || *c == ' ')
        .collect();
    let ascii_name = if ascii_name.trim().is_empty() {
        "file"
    } else {
        ascii_name.as_str()
    };
    let full_name = if cleaned.trim().is_empty() {
        "file"
    } else {
        cleaned.as_str()
    };

    let encoded: String = full_name
        .bytes()
        .map(|b| match b {
            b'A'..=b'Z'
            | b'a'..=b'z'
            | b'0'..=b'9'
            | b'!'
            | b'#'
            | b'$'
            | b'&'
            | b'+'
            | b'-'
            | b'.'
            | b'^'
            | b'_'
            | b'`'
            | b'|'
            | b'~' => String::from(b as char),
            _ => format!("%{b:02X}"),
        })
        .collect();

    format!("attachment; filename=\"{ascii_name}\"; filename*=UTF-8''{encoded}")
}
