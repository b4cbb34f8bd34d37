pub mod session_reaper;

pub use session_reaper::SessionReaper;
