//! Application startup and server initialization.
//!
//! Builds the registry client, the collector and the HTTP server.

use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

use crate::config::ExporterConfig;
use crate::metrics::{LimitCollector, Metrics};
use crate::registry::{Endpoints, RegistryClient};
use crate::routes;
use crate::state::AppState;

/// Builds the shared state against the given registry endpoints.
///
/// Fails if the HTTP client cannot be built or a metric descriptor is invalid.
pub fn build_state(
    config: &ExporterConfig,
    endpoints: Endpoints,
) -> Result<AppState, Box<dyn std::error::Error>> {
    let client = RegistryClient::new(config.credentials(), endpoints, config.timeout())?;
    let metrics = Metrics::new()?;
    let collector = LimitCollector::new(client, metrics.clone())?;

    for desc in collector.describe() {
        info!(
            event_name = "startup.collector.describe",
            event_domain = "startup",
            metric = desc.fq_name.as_str(),
            "registered gauge"
        );
    }

    Ok(AppState {
        collector: Arc::new(collector),
        metrics,
    })
}

/// Initializes and runs the exporter.
///
/// # Errors
///
/// Returns an error if the state cannot be built, the listener fails to bind
/// to the configured port, or the server stops with an I/O error.
pub async fn run(config: Arc<ExporterConfig>) -> Result<(), Box<dyn std::error::Error>> {
    let state = build_state(&config, Endpoints::default())?;
    let app = routes::create_router(state);

    let bind_address = config.bind_address();
    let listener = TcpListener::bind(&bind_address).await?;

    info!(
        event_name = "startup.listening",
        event_domain = "startup",
        authenticated = config.credentials().basic_auth().is_some(),
        "serving requests at {}",
        bind_address
    );

    axum::serve(listener, app).await?;

    Ok(())
}
