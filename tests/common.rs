use axum::body::{to_bytes, Body};
use axum::http::{Method, Request, Response};
use axum::Router;
use dockerhub_limit_exporter::config::ExporterConfig;
use dockerhub_limit_exporter::registry::Endpoints;
use dockerhub_limit_exporter::routes::create_router;
use dockerhub_limit_exporter::startup::build_state;

pub const TOKEN_PATH: &str = "/token";
pub const MANIFEST_PATH: &str = "/v2/ratelimitpreview/test/manifests/latest";

/// Builds the router with both auth and registry calls pointed at `base_url`.
pub fn build_app(config: &ExporterConfig, base_url: &str) -> Router {
    let state = build_state(config, Endpoints::new(base_url, base_url))
        .expect("state should build");
    create_router(state)
}

pub fn config_with_credentials(username: Option<&str>, password: Option<&str>) -> ExporterConfig {
    ExporterConfig {
        username: username.map(str::to_string),
        password: password.map(str::to_string),
        ..ExporterConfig::default()
    }
}

pub fn scrape_request() -> Request<Body> {
    Request::builder()
        .method(Method::GET)
        .uri("/metrics")
        .body(Body::empty())
        .expect("failed to build request")
}

pub async fn body_text(response: Response<Body>) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body should be readable");
    String::from_utf8(bytes.to_vec()).expect("body should be UTF-8")
}
