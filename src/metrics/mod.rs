//! Metrics collection and exposition for Prometheus.
//!
//! The rate-limit gauges are computed per scrape by [`LimitCollector`];
//! [`Metrics`] holds counters about the exporter itself.

mod collector;
mod recorder;

pub use collector::LimitCollector;
pub use recorder::{Metrics, ScrapeRecorder};

use prometheus::proto::MetricFamily;
use prometheus::{Encoder, TextEncoder};

/// Content type of the text exposition format.
pub const TEXT_CONTENT_TYPE: &str = "text/plain; version=0.0.4; charset=utf-8";

/// Renders metric families in Prometheus text format.
pub fn encode_text(families: &[MetricFamily]) -> Result<String, prometheus::Error> {
    let encoder = TextEncoder::new();
    let mut buffer = Vec::new();
    encoder.encode(families, &mut buffer)?;
    String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
}
