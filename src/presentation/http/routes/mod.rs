pub mod health_routes;
pub mod page_routes;
pub mod session_routes;

pub use health_routes::*;
pub use page_routes::*;
pub use session_routes::*;
