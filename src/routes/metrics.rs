//! Metrics exposition endpoint.

use crate::metrics::{encode_text, TEXT_CONTENT_TYPE};
use crate::state::AppState;
use axum::{extract::State, http::header, http::StatusCode, response::IntoResponse, routing::get, Router};
use tracing::error;

/// Creates the metrics route.
pub fn routes() -> Router<AppState> {
    Router::new().route("/metrics", get(metrics_handler))
}

/// Handler for the /metrics endpoint.
///
/// Runs a fresh registry lookup and returns the rate-limit gauges followed by
/// the exporter's own metrics. Lookup failures show up as zero gauges, not as
/// an error status.
async fn metrics_handler(State(state): State<AppState>) -> impl IntoResponse {
    let mut families = state.collector.collect().await;
    families.extend(state.metrics.gather());

    match encode_text(&families) {
        Ok(metrics_text) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, TEXT_CONTENT_TYPE)],
            metrics_text,
        ),
        Err(e) => {
            error!(
                event_name = "routes.metrics.encode_failed",
                event_domain = "routes",
                error = %e,
                "failed to encode metrics"
            );
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
                "failed to encode metrics".to_string(),
            )
        }
    }
}
