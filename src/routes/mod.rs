//! HTTP route definitions and handlers.
//!
//! The exporter serves a single endpoint, `/metrics`.

mod metrics;

use crate::state::AppState;
use axum::Router;

/// Creates the application router with all configured routes.
pub fn create_router(state: AppState) -> Router {
    Router::new().merge(metrics::routes()).with_state(state)
}
