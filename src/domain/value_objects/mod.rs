pub mod content_hash;
pub mod session_scope;
pub mod session_stage;

pub use content_hash::ContentHash;
pub use session_scope::SessionScope;
pub use session_stage::SessionStage;
