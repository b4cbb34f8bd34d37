pub mod background;
pub mod config;
pub mod container;
pub mod external_services;
pub mod file_system;
pub mod memory;
pub mod telemetry;

pub use config::AppConfig;
pub use container::AppContainer;
