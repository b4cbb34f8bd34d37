pub mod page_handler;
pub mod session_handler;

pub use session_handler::SessionHandler;
