//! Rate-limit gauges computed on every scrape.

use std::time::Instant;

use prometheus::core::{Collector, Desc, Describer};
use prometheus::proto::MetricFamily;
use prometheus::{Gauge, Opts};
use tracing::{error, warn};

use super::recorder::ScrapeRecorder;
use crate::models::RateLimitSnapshot;
use crate::registry::RegistryClient;

const LIMIT_LABEL: &str = "limit";

/// Collector for the Docker Hub pull quota.
///
/// Descriptors are validated once at construction. Every `collect` performs
/// a fresh token and manifest lookup; concurrent scrapes do not share state.
pub struct LimitCollector<R: ScrapeRecorder> {
    client: RegistryClient,
    recorder: R,
    max_requests: Opts,
    remaining_requests: Opts,
    descs: Vec<Desc>,
}

impl<R: ScrapeRecorder> LimitCollector<R> {
    pub fn new(client: RegistryClient, recorder: R) -> Result<Self, prometheus::Error> {
        let max_requests = Opts::new(
            "dockerhub_limit_max_requests_total",
            "Docker Hub Rate Limit Max Requests",
        )
        .const_label(LIMIT_LABEL, "max_requests_total");
        let remaining_requests = Opts::new(
            "dockerhub_limit_remaining_requests_total",
            "Docker Hub Rate Limit Remaining Requests",
        )
        .const_label(LIMIT_LABEL, "remaining_requests_total");

        let descs = vec![max_requests.describe()?, remaining_requests.describe()?];

        Ok(Self {
            client,
            recorder,
            max_requests,
            remaining_requests,
            descs,
        })
    }

    /// The two gauge descriptors. Makes no outbound calls.
    pub fn describe(&self) -> Vec<&Desc> {
        self.descs.iter().collect()
    }

    /// Looks up the current quota and returns both gauges.
    ///
    /// Never fails: when the lookup fails the error is logged and both gauges
    /// report 0.
    pub async fn collect(&self) -> Vec<MetricFamily> {
        let started = Instant::now();
        let outcome = self.client.fetch_limits().await;
        let elapsed = started.elapsed().as_secs_f64();

        let snapshot = match outcome {
            Ok(snapshot) => {
                self.recorder.record_scrape("success");
                self.recorder.record_scrape_duration(elapsed, "success");
                snapshot
            }
            Err(e) => {
                warn!(
                    event_name = "collector.limits.failed",
                    event_domain = "collector",
                    error_kind = e.kind(),
                    error = %e,
                    "couldn't get limits, reporting zero"
                );
                self.recorder.record_scrape(e.kind());
                self.recorder.record_scrape_duration(elapsed, e.kind());
                RateLimitSnapshot::default()
            }
        };

        self.families(snapshot)
    }

    fn families(&self, snapshot: RateLimitSnapshot) -> Vec<MetricFamily> {
        [
            (&self.max_requests, snapshot.limit),
            (&self.remaining_requests, snapshot.remaining),
        ]
        .into_iter()
        .flat_map(|(opts, value)| gauge_family(opts, value))
        .collect()
    }
}

fn gauge_family(opts: &Opts, value: u64) -> Vec<MetricFamily> {
    match Gauge::with_opts(opts.clone()) {
        Ok(gauge) => {
            gauge.set(value as f64);
            gauge.collect()
        }
        Err(e) => {
            // Unreachable once the descriptor validated in `new`.
            error!(metric = opts.name.as_str(), "failed to build gauge: {}", e);
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Credentials;
    use crate::metrics::encode_text;
    use crate::registry::Endpoints;
    use crate::utils::captured_logs::CapturedLogs;
    use mockito::{Matcher, Server};
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct RecordingRecorder {
        results: Arc<Mutex<Vec<String>>>,
    }

    impl ScrapeRecorder for RecordingRecorder {
        fn record_scrape(&self, result: &str) {
            self.results.lock().unwrap().push(result.to_string());
        }

        fn record_scrape_duration(&self, _duration_secs: f64, _result: &str) {}
    }

    fn collector(base_url: &str, recorder: RecordingRecorder) -> LimitCollector<RecordingRecorder> {
        let client = RegistryClient::new(
            Credentials::default(),
            Endpoints::new(base_url, base_url),
            None,
        )
        .unwrap();
        LimitCollector::new(client, recorder).unwrap()
    }

    fn gauge_value(families: &[MetricFamily], name: &str) -> f64 {
        families
            .iter()
            .find(|mf| mf.get_name() == name)
            .map(|mf| mf.get_metric()[0].get_gauge().get_value())
            .unwrap_or_else(|| panic!("metric {name} missing"))
    }

    #[test]
    fn describe_emits_two_descriptors_without_network() {
        // Nothing listens on port 1; describe must not care.
        let collector = collector("http://127.0.0.1:1", RecordingRecorder::default());
        let descs = collector.describe();

        assert_eq!(descs.len(), 2);
        assert_eq!(descs[0].fq_name, "dockerhub_limit_max_requests_total");
        assert_eq!(descs[1].fq_name, "dockerhub_limit_remaining_requests_total");
        assert_eq!(descs[0].const_label_pairs[0].get_name(), "limit");
        assert_eq!(descs[0].const_label_pairs[0].get_value(), "max_requests_total");
    }

    #[tokio::test]
    async fn collect_reports_fetched_values() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/token")
            .match_query(Matcher::Any)
            .with_body(r#"{"token":"t1"}"#)
            .create_async()
            .await;
        server
            .mock("HEAD", "/v2/ratelimitpreview/test/manifests/latest")
            .match_header("authorization", "Bearer t1")
            .with_header("RateLimit-Limit", "100")
            .with_header("RateLimit-Remaining", "50;w=3600")
            .create_async()
            .await;

        let recorder = RecordingRecorder::default();
        let families = collector(&server.url(), recorder.clone()).collect().await;

        assert_eq!(families.len(), 2);
        assert_eq!(gauge_value(&families, "dockerhub_limit_max_requests_total"), 100.0);
        assert_eq!(gauge_value(&families, "dockerhub_limit_remaining_requests_total"), 50.0);
        assert_eq!(*recorder.results.lock().unwrap(), vec!["success".to_string()]);
    }

    #[tokio::test]
    async fn collect_reports_zero_when_token_endpoint_unreachable() {
        let recorder = RecordingRecorder::default();
        let families = collector("http://127.0.0.1:1", recorder.clone()).collect().await;

        assert_eq!(families.len(), 2);
        assert_eq!(gauge_value(&families, "dockerhub_limit_max_requests_total"), 0.0);
        assert_eq!(gauge_value(&families, "dockerhub_limit_remaining_requests_total"), 0.0);
        assert_eq!(*recorder.results.lock().unwrap(), vec!["network".to_string()]);
    }

    #[tokio::test]
    async fn collect_logs_a_warning_when_lookup_fails() {
        let logs = CapturedLogs::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .with_max_level(tracing::Level::WARN)
            .finish();
        // Current-thread runtime, so the scoped subscriber sees the whole scrape.
        let _guard = tracing::subscriber::set_default(subscriber);

        let families = collector("http://127.0.0.1:1", RecordingRecorder::default())
            .collect()
            .await;
        assert_eq!(gauge_value(&families, "dockerhub_limit_max_requests_total"), 0.0);

        let output = logs.contents();
        let failures: Vec<&str> = output
            .lines()
            .filter(|line| line.contains("collector.limits.failed"))
            .collect();
        assert_eq!(failures.len(), 1, "logs were:\n{output}");
        assert!(failures[0].contains("WARN"), "logs were:\n{output}");
        assert!(failures[0].contains(r#"error_kind="network""#), "logs were:\n{output}");
        assert!(failures[0].contains("couldn't get limits, reporting zero"));
    }

    #[tokio::test]
    async fn collect_logs_nothing_at_warn_on_success() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/token")
            .match_query(Matcher::Any)
            .with_body(r#"{"token":"t1"}"#)
            .create_async()
            .await;
        server
            .mock("HEAD", "/v2/ratelimitpreview/test/manifests/latest")
            .with_header("RateLimit-Limit", "100")
            .with_header("RateLimit-Remaining", "100")
            .create_async()
            .await;

        let logs = CapturedLogs::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .with_max_level(tracing::Level::WARN)
            .finish();
        let _guard = tracing::subscriber::set_default(subscriber);

        collector(&server.url(), RecordingRecorder::default()).collect().await;

        assert!(!logs.contents().contains("collector.limits.failed"));
    }

    #[tokio::test]
    async fn collect_reports_zero_on_malformed_header() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/token")
            .match_query(Matcher::Any)
            .with_body(r#"{"token":"t1"}"#)
            .create_async()
            .await;
        server
            .mock("HEAD", "/v2/ratelimitpreview/test/manifests/latest")
            .with_header("RateLimit-Limit", "100")
            .with_header("RateLimit-Remaining", "abc;100")
            .create_async()
            .await;

        let recorder = RecordingRecorder::default();
        let families = collector(&server.url(), recorder.clone()).collect().await;

        assert_eq!(gauge_value(&families, "dockerhub_limit_max_requests_total"), 0.0);
        assert_eq!(*recorder.results.lock().unwrap(), vec!["parse".to_string()]);
    }

    #[test]
    fn families_render_with_identifying_labels() {
        let collector = collector("http://127.0.0.1:1", RecordingRecorder::default());
        let text = encode_text(&collector.families(RateLimitSnapshot {
            limit: 200,
            remaining: 7,
        }))
        .unwrap();

        assert!(text.contains("# TYPE dockerhub_limit_max_requests_total gauge"));
        assert!(text.contains(r#"dockerhub_limit_max_requests_total{limit="max_requests_total"} 200"#));
        assert!(text.contains(
            r#"dockerhub_limit_remaining_requests_total{limit="remaining_requests_total"} 7"#
        ));
    }
}
