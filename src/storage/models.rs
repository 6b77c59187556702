use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DocIdError {
    #[error("invalid document id: {0:?}")]
    Invalid(String),
}

/// A 12-byte ObjectId-style identifier shared by documents and file blobs.
///
/// Layout: 4-byte big-endian unix seconds, 5 bytes of per-process randomness,
/// 3-byte big-endian counter. Rendered as 24 lowercase hex characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DocId([u8; 12]);

static PROCESS_UNIQUE: OnceLock<[u8; 5]> = OnceLock::new();
static COUNTER: OnceLock<AtomicU32> = OnceLock::new();

impl DocId {
    /// Generate a fresh identifier.
    pub fn new() -> Self {
        let random = PROCESS_UNIQUE.get_or_init(|| {
            let seed = uuid::Uuid::new_v4();
            let mut out = [0u8; 5];
            out.copy_from_slice(&seed.as_bytes()[..5]);
            out
        });
        let counter = COUNTER.get_or_init(|| {
            let seed = uuid::Uuid::new_v4();
            let b = seed.as_bytes();
            AtomicU32::new(u32::from_be_bytes([0, b[0], b[1], b[2]]))
        });

        let secs = Utc::now().timestamp() as u32;
        let count = counter.fetch_add(1, Ordering::Relaxed) & 0x00ff_ffff;

        let mut bytes = [0u8; 12];
        bytes[..4].copy_from_slice(&secs.to_be_bytes());
        bytes[4..9].copy_from_slice(random);
        bytes[9..].copy_from_slice(&count.to_be_bytes()[1..]);
        Self(bytes)
    }

    /// Hex form, used as the redb key.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl Default for DocId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for DocId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for DocId {
    type Err = DocIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut bytes = [0u8; 12];
        hex::decode_to_slice(s, &mut bytes).map_err(|_| DocIdError::Invalid(s.to_string()))?;
        Ok(Self(bytes))
    }
}

impl TryFrom<String> for DocId {
    type Error = DocIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<DocId> for String {
    fn from(id: DocId) -> Self {
        id.to_hex()
    }
}

/// A document record stored in redb
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentRecord {
    pub id: DocId,
    pub title: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,

    // Populated by upload
    #[serde(default)]
    pub mime_type: Option<String>,
    #[serde(default)]
    pub size: Option<u64>,
    #[serde(default)]
    pub text_preview: Option<String>,
    #[serde(default)]
    pub file_blob_id: Option<DocId>,
}

impl DocumentRecord {
    /// True if the title or any tag contains `needle` (already lowercased).
    pub fn matches(&self, needle: &str) -> bool {
        self.title.to_lowercase().contains(needle)
            || self.tags.iter().any(|t| t.to_lowercase().contains(needle))
    }
}

/// Metadata of an uploaded file. The bytes live in `FILE_CONTENTS`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileBlobRecord {
    pub id: DocId,
    pub doc_id: DocId,
    #[serde(default)]
    pub filename: Option<String>,
    #[serde(default)]
    pub content_type: Option<String>,
    pub size: u64,
}

/// A file blob together with its content.
#[derive(Debug, Clone, PartialEq)]
pub struct FileBlob {
    pub record: FileBlobRecord,
    pub content: Vec<u8>,
}

/// Title, tags and notes as supplied on create and update.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocumentFields {
    pub title: String,
    pub tags: Vec<String>,
    pub notes: Option<String>,
}

/// A file to attach to a document.
#[derive(Debug, Clone, Default)]
pub struct NewFile {
    pub filename: Option<String>,
    pub content_type: Option<String>,
    pub content: Vec<u8>,
    pub text_preview: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_doc_id_round_trip() {
        let id = DocId::new();
        let text = id.to_string();
        assert_eq!(text.len(), 24);
        assert!(text.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
        assert_eq!(text.parse::<DocId>().unwrap(), id);
    }

    #[test]
    fn test_doc_id_accepts_uppercase() {
        let id: DocId = "65A1B2C3D4E5F60718293A4B".parse().unwrap();
        assert_eq!(id.to_string(), "65a1b2c3d4e5f60718293a4b");
    }

    #[test]
    fn test_doc_id_rejects_malformed() {
        for bad in ["", "abc", "65a1b2c3d4e5f60718293a4", "65a1b2c3d4e5f60718293a4bc", "zza1b2c3d4e5f60718293a4b"] {
            assert_eq!(
                bad.parse::<DocId>(),
                Err(DocIdError::Invalid(bad.to_string())),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_doc_ids_are_unique() {
        let a = DocId::new();
        let b = DocId::new();
        assert_ne!(a, b);
        // Same process, same random segment
        assert_eq!(a.to_hex()[8..18], b.to_hex()[8..18]);
    }

    #[test]
    fn test_doc_id_serde_as_string() {
        let id: DocId = "65a1b2c3d4e5f60718293a4b".parse().unwrap();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"65a1b2c3d4e5f60718293a4b\"");
        let back: DocId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
        assert!(serde_json::from_str::<DocId>("\"nope\"").is_err());
    }

    #[test]
    fn test_document_matches_title_or_tag() {
        let now = Utc::now();
        let doc = DocumentRecord {
            id: DocId::new(),
            title: "Invoice #2".to_string(),
            tags: vec!["Finance".to_string(), "2024".to_string()],
            notes: None,
            created_at: now,
            updated_at: now,
            mime_type: None,
            size: None,
            text_preview: None,
            file_blob_id: None,
        };
        assert!(doc.matches("invoice"));
        assert!(doc.matches("finan"));
        assert!(doc.matches("#2"));
        assert!(!doc.matches("receipt"));
    }
}
