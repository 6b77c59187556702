use chrono::Utc;
use redb::ReadableTable;

use super::db::{Database, DatabaseError};
use super::models::{
    DocId, DocumentFields, DocumentRecord, FileBlob, FileBlobRecord, NewFile,
};
use super::tables::*;

impl Database {
    // ========================================================================
    // Document operations
    // ========================================================================

    /// Insert a new document with no file attached and return it
    pub fn create_document(&self, fields: DocumentFields) -> Result<DocumentRecord, DatabaseError> {
        let now = Utc::now();
        let doc = DocumentRecord {
            id: DocId::new(),
            title: fields.title,
            tags: fields.tags,
            notes: fields.notes,
            created_at: now,
            updated_at: now,
            mime_type: None,
            size: None,
            text_preview: None,
            file_blob_id: None,
        };
        self.put_document(&doc)?;
        Ok(doc)
    }

    /// Store a document record as-is
    pub fn put_document(&self, doc: &DocumentRecord) -> Result<(), DatabaseError> {
        let write_txn = self.begin_write()?;
        {
            let mut table = write_txn.open_table(DOCUMENTS)?;
            let data = rmp_serde::to_vec_named(doc)?;
            table.insert(doc.id.to_hex().as_str(), data.as_slice())?;
        }
        write_txn.commit()?;
        Ok(())
    }

    /// Get a document by id
    pub fn get_document(&self, id: &DocId) -> Result<Option<DocumentRecord>, DatabaseError> {
        let read_txn = self.begin_read()?;
        let table = read_txn.open_table(DOCUMENTS)?;

        match table.get(id.to_hex().as_str())? {
            Some(data) => {
                let doc: DocumentRecord = rmp_serde::from_slice(data.value())?;
                Ok(Some(doc))
            }
            None => Ok(None),
        }
    }

    /// List documents newest first, optionally filtered by a case-insensitive
    /// substring of the title or any tag. An empty query matches everything.
    pub fn list_documents(&self, query: Option<&str>) -> Result<Vec<DocumentRecord>, DatabaseError> {
        let read_txn = self.begin_read()?;
        let table = read_txn.open_table(DOCUMENTS)?;

        let needle = query.filter(|q| !q.is_empty()).map(str::to_lowercase);

        let mut docs = Vec::new();
        for result in table.iter()? {
            let (_, value) = result?;
            let doc: DocumentRecord = rmp_serde::from_slice(value.value())?;
            if needle.as_deref().map_or(true, |n| doc.matches(n)) {
                docs.push(doc);
            }
        }

        docs.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(docs)
    }

    /// Overwrite title, tags and notes. Returns `None` if no document matched.
    pub fn update_document(
        &self,
        id: &DocId,
        fields: DocumentFields,
    ) -> Result<Option<DocumentRecord>, DatabaseError> {
        let key = id.to_hex();
        let write_txn = self.begin_write()?;

        let existing = {
            let table = write_txn.open_table(DOCUMENTS)?;
            let result = match table.get(key.as_str())? {
                Some(data) => Some(rmp_serde::from_slice::<DocumentRecord>(data.value())?),
                None => None,
            };
            result
        };

        let updated = match existing {
            Some(mut doc) => {
                doc.title = fields.title;
                doc.tags = fields.tags;
                doc.notes = fields.notes;
                doc.updated_at = Utc::now();

                let serialized = rmp_serde::to_vec_named(&doc)?;
                let mut table = write_txn.open_table(DOCUMENTS)?;
                table.insert(key.as_str(), serialized.as_slice())?;
                Some(doc)
            }
            None => None,
        };

        write_txn.commit()?;
        Ok(updated)
    }

    /// Delete a document and its current file blob. Returns `false` if the
    /// document did not exist.
    pub fn delete_document(&self, id: &DocId) -> Result<bool, DatabaseError> {
        let key = id.to_hex();
        let write_txn = self.begin_write()?;

        let blob_id: Option<Option<DocId>> = {
            let table = write_txn.open_table(DOCUMENTS)?;
            let result = match table.get(key.as_str())? {
                Some(data) => {
                    let doc: DocumentRecord = rmp_serde::from_slice(data.value())?;
                    Some(doc.file_blob_id)
                }
                None => None,
            };
            result
        };

        let deleted = match blob_id {
            Some(blob_id) => {
                if let Some(blob_id) = blob_id {
                    remove_blob(&write_txn, &blob_id)?;
                }
                let mut table = write_txn.open_table(DOCUMENTS)?;
                table.remove(key.as_str())?;
                true
            }
            None => false,
        };

        write_txn.commit()?;
        Ok(deleted)
    }

    // ========================================================================
    // File blob operations
    // ========================================================================

    /// Store `file` as a new blob and point the document at it, replacing
    /// (and deleting) any blob it referenced before. The upload fields
    /// `mime_type`, `size` and `text_preview` are overwritten.
    ///
    /// Returns `None` if the document does not exist; nothing is written then.
    pub fn attach_file(
        &self,
        doc_id: &DocId,
        file: NewFile,
    ) -> Result<Option<DocumentRecord>, DatabaseError> {
        let key = doc_id.to_hex();
        let write_txn = self.begin_write()?;

        let existing = {
            let table = write_txn.open_table(DOCUMENTS)?;
            let result = match table.get(key.as_str())? {
                Some(data) => Some(rmp_serde::from_slice::<DocumentRecord>(data.value())?),
                None => None,
            };
            result
        };

        let Some(mut doc) = existing else {
            write_txn.abort()?;
            return Ok(None);
        };

        let blob = FileBlobRecord {
            id: DocId::new(),
            doc_id: *doc_id,
            filename: file.filename,
            content_type: file.content_type.clone(),
            size: file.content.len() as u64,
        };
        let blob_key = blob.id.to_hex();
        {
            let mut blobs = write_txn.open_table(FILE_BLOBS)?;
            let data = rmp_serde::to_vec_named(&blob)?;
            blobs.insert(blob_key.as_str(), data.as_slice())?;

            let mut contents = write_txn.open_table(FILE_CONTENTS)?;
            contents.insert(blob_key.as_str(), file.content.as_slice())?;
        }

        if let Some(previous) = doc.file_blob_id.replace(blob.id) {
            remove_blob(&write_txn, &previous)?;
        }
        doc.mime_type = file.content_type;
        doc.size = Some(blob.size);
        doc.text_preview = file.text_preview;
        doc.updated_at = Utc::now();

        {
            let serialized = rmp_serde::to_vec_named(&doc)?;
            let mut table = write_txn.open_table(DOCUMENTS)?;
            table.insert(key.as_str(), serialized.as_slice())?;
        }

        write_txn.commit()?;
        Ok(Some(doc))
    }

    /// Get a blob and its content by blob id
    pub fn get_file_blob(&self, id: &DocId) -> Result<Option<FileBlob>, DatabaseError> {
        let key = id.to_hex();
        let read_txn = self.begin_read()?;
        let blobs = read_txn.open_table(FILE_BLOBS)?;
        let contents = read_txn.open_table(FILE_CONTENTS)?;

        let record: FileBlobRecord = match blobs.get(key.as_str())? {
            Some(data) => rmp_serde::from_slice(data.value())?,
            None => return Ok(None),
        };
        let content = match contents.get(key.as_str())? {
            Some(data) => data.value().to_vec(),
            None => return Ok(None),
        };

        Ok(Some(FileBlob { record, content }))
    }
}

fn remove_blob(write_txn: &redb::WriteTransaction, id: &DocId) -> Result<(), DatabaseError> {
    let key = id.to_hex();
    let mut blobs = write_txn.open_table(FILE_BLOBS)?;
    blobs.remove(key.as_str())?;
    let mut contents = write_txn.open_table(FILE_CONTENTS)?;
    contents.remove(key.as_str())?;
    Ok(())
}
