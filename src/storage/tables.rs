use redb::TableDefinition;

/// Document records: doc id -> DocumentRecord (msgpack)
pub const DOCUMENTS: TableDefinition<&str, &[u8]> = TableDefinition::new("document");

/// File blob metadata: blob id -> FileBlobRecord (msgpack)
pub const FILE_BLOBS: TableDefinition<&str, &[u8]> = TableDefinition::new("fileblob");

/// Raw file content: blob id -> bytes
pub const FILE_CONTENTS: TableDefinition<&str, &[u8]> = TableDefinition::new("fileblob_content");
