use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::value_objects::ContentHash;

/// Where the current upload of a session lives on disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentReference {
    path: String,
    file_name: String,
    size: u64,
    content_hash: ContentHash,
    stored_at: DateTime<Utc>,
}

impl DocumentReference {
    pub fn new(path: String, file_name: String, size: u64, content_hash: ContentHash) -> Self {
        Self {
            path,
            file_name,
            size,
            content_hash,
            stored_at: Utc::now(),
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Name the operator uploaded the file under. Display only.
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn size(&self) -> u64 {
        self.size
    }

    pub fn content_hash(&self) -> &ContentHash {
        &self.content_hash
    }

    pub fn stored_at(&self) -> DateTime<Utc> {
        self.stored_at
    }
}
