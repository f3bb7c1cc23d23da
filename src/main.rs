use std::sync::Arc;

use dockerhub_limit_exporter::config::load_config;
use dockerhub_limit_exporter::startup;
use dockerhub_limit_exporter::utils::init_logging;

#[tokio::main]
async fn main() {
    let config = load_config();

    if let Err(e) = init_logging(&config.logging) {
        eprintln!("Error initializing logging: {}", e);
        std::process::exit(1);
    }

    if let Err(e) = startup::run(Arc::new(config)).await {
        tracing::error!(
            event_name = "startup.failed",
            event_domain = "startup",
            "exporter stopped: {}",
            e
        );
        std::process::exit(1);
    }
}
