use serde::{Deserialize, Serialize};

/// Where a session sits in the upload → index → chat pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SessionStage {
    Empty,
    DocumentReady,
    Indexing,
    ChatReady,
}

impl SessionStage {
    pub fn is_indexing(&self) -> bool {
        matches!(self, SessionStage::Indexing)
    }

    pub fn is_chat_ready(&self) -> bool {
        matches!(self, SessionStage::ChatReady)
    }

    pub fn can_transition_to(&self, next: &SessionStage) -> bool {
        match (self, next) {
            // Uploads and failed indexing runs both land here.
            (_, SessionStage::DocumentReady) => true,
            (SessionStage::DocumentReady, SessionStage::Indexing) => true,
            (SessionStage::Indexing, SessionStage::ChatReady) => true,
            _ => false,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SessionStage::Empty => "EMPTY",
            SessionStage::DocumentReady => "DOCUMENT_READY",
            SessionStage::Indexing => "INDEXING",
            SessionStage::ChatReady => "CHAT_READY",
        }
    }
}

impl Default for SessionStage {
    fn default() -> Self {
        SessionStage::Empty
    }
}

impl std::fmt::Display for SessionStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
