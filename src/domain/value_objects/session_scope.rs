use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The two externally shared names a session writes to: the temp document
/// slot and the vector store collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionScope {
    document_slot: String,
    collection_name: String,
    isolated: bool,
}

impl SessionScope {
    /// Every session writes `file_name` and `collection_name` as-is; the
    /// last writer wins.
    pub fn shared(file_name: &str, collection_name: &str) -> Self {
        Self {
            document_slot: file_name.to_string(),
            collection_name: collection_name.to_string(),
            isolated: false,
        }
    }

    /// Slot and collection are suffixed with the session id.
    pub fn isolated(session_id: Uuid, file_name: &str, collection_name: &str) -> Self {
        let suffix = session_id.simple().to_string();
        Self {
            document_slot: format!("{}/{}", suffix, file_name),
            collection_name: format!("{}_{}", collection_name, suffix),
            isolated: true,
        }
    }

    pub fn document_slot(&self) -> &str {
        &self.document_slot
    }

    pub fn collection_name(&self) -> &str {
        &self.collection_name
    }

    pub fn is_isolated(&self) -> bool {
        self.isolated
    }
}
