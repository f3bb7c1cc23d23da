//! Shared application state.
//!
//! Contains the state that is shared across all request handlers: the
//! rate-limit collector and the exporter's own metrics.

use crate::metrics::{LimitCollector, Metrics};
use std::sync::Arc;

/// Application state shared across all HTTP handlers.
///
/// Cloned for each request; everything inside is read-only apart from the
/// atomic counters in `metrics`.
#[derive(Clone)]
pub struct AppState {
    /// Collector performing the registry lookup on every scrape.
    pub collector: Arc<LimitCollector<Metrics>>,
    /// Self-metrics appended after the rate-limit gauges.
    pub metrics: Metrics,
}
