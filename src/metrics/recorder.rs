//! Exporter self-metrics using Prometheus.

use prometheus::proto::MetricFamily;
use prometheus::{
    register_counter_vec_with_registry, register_histogram_vec_with_registry, CounterVec,
    HistogramVec, Opts, Registry,
};
use std::sync::Arc;

/// Trait for recording the outcome of each scrape.
pub trait ScrapeRecorder: Clone + Send + Sync + 'static {
    /// Records a scrape with its outcome (`success` or an error kind).
    fn record_scrape(&self, result: &str);

    /// Records how long the upstream calls of a scrape took.
    fn record_scrape_duration(&self, duration_secs: f64, result: &str);
}

/// Prometheus metrics about the exporter itself.
#[derive(Clone)]
pub struct Metrics {
    registry: Arc<Registry>,

    scrapes_total: CounterVec,
    scrape_duration_seconds: HistogramVec,
}

impl Metrics {
    /// Creates the self-metrics in a dedicated registry.
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Arc::new(Registry::new());

        let scrapes_total = register_counter_vec_with_registry!(
            Opts::new(
                "dockerhub_exporter_scrapes_total",
                "Total number of rate-limit lookups by outcome"
            ),
            &["result"],
            registry.clone()
        )?;

        let scrape_duration_seconds = register_histogram_vec_with_registry!(
            "dockerhub_exporter_scrape_duration_seconds",
            "Duration of the token and manifest requests of a scrape in seconds",
            &["result"],
            vec![0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0],
            registry.clone()
        )?;

        Ok(Metrics {
            registry,
            scrapes_total,
            scrape_duration_seconds,
        })
    }

    pub fn gather(&self) -> Vec<MetricFamily> {
        self.registry.gather()
    }
}

impl ScrapeRecorder for Metrics {
    fn record_scrape(&self, result: &str) {
        self.scrapes_total.with_label_values(&[result]).inc();
    }

    fn record_scrape_duration(&self, duration_secs: f64, result: &str) {
        self.scrape_duration_seconds
            .with_label_values(&[result])
            .observe(duration_secs);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::encode_text;

    #[test]
    fn records_outcomes_by_label() {
        let metrics = Metrics::new().unwrap();
        metrics.record_scrape("success");
        metrics.record_scrape("network");
        metrics.record_scrape("network");
        metrics.record_scrape_duration(0.2, "network");

        let text = encode_text(&metrics.gather()).unwrap();
        assert!(text.contains(r#"dockerhub_exporter_scrapes_total{result="success"} 1"#));
        assert!(text.contains(r#"dockerhub_exporter_scrapes_total{result="network"} 2"#));
        assert!(text.contains(r#"dockerhub_exporter_scrape_duration_seconds_count{result="network"} 1"#));
    }

    #[test]
    fn fresh_registry_has_no_samples() {
        let metrics = Metrics::new().unwrap();
        assert!(metrics.gather().is_empty());
    }
}
