mod application;
mod domain;
mod infrastructure;
mod presentation;

use infrastructure::{AppConfig, AppContainer, telemetry};

#[tokio::main]
async fn main() {
    telemetry::init_tracing();

    let config = AppConfig::from_env();
    tracing::info!(
        port = config.server.port,
        upload_dir = %config.storage.upload_dir.display(),
        isolate_sessions = config.storage.isolate_sessions,
        "starting docchat"
    );

    let container = match AppContainer::new(&config) {
        Ok(container) => container,
        Err(e) => {
            tracing::error!("failed to initialise services: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = container.http_server().run().await {
        tracing::error!("server error: {}", e);
        std::process::exit(1);
    }
}
