use std::time::Duration;

use reqwest::header::HeaderMap;
use tracing::debug;

use super::endpoints::Endpoints;
use super::header::parse_limit;
use crate::config::Credentials;
use crate::error::{Error, Result};
use crate::models::{RateLimitHeaders, RateLimitSnapshot, TokenResponse};

const LIMIT_HEADER: &str = "ratelimit-limit";
const REMAINING_HEADER: &str = "ratelimit-remaining";
const RESET_HEADER: &str = "ratelimit-reset";

/// Client for the registry auth service and manifest endpoint.
///
/// Holds one connection pool for the process lifetime. Credentials are fixed
/// at construction; a fresh token is requested for every limit fetch.
#[derive(Clone, Debug)]
pub struct RegistryClient {
    http: reqwest::Client,
    endpoints: Endpoints,
    credentials: Credentials,
}

impl RegistryClient {
    /// Builds a client. `timeout` bounds every outbound request; `None` waits forever.
    pub fn new(
        credentials: Credentials,
        endpoints: Endpoints,
        timeout: Option<Duration>,
    ) -> Result<Self, reqwest::Error> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            http: builder.build()?,
            endpoints,
            credentials,
        })
    }

    /// Requests a pull-only bearer token for the rate-limit test repository.
    ///
    /// Basic auth is attached only when both username and password are set.
    /// The response status is not checked: an error body has no `token`
    /// field and fails to decode.
    pub async fn fetch_token(&self) -> Result<String> {
        let url = &self.endpoints.auth_url;
        let scope = self.endpoints.scope();

        let mut request = self
            .http
            .get(url)
            .query(&[("service", self.endpoints.service.as_str()), ("scope", scope.as_str())]);

        if let Some((username, password)) = self.credentials.basic_auth() {
            debug!(
                event_name = "registry.token.request",
                event_domain = "registry",
                username,
                "requesting authenticated token"
            );
            request = request.basic_auth(username, Some(password));
        } else {
            debug!(
                event_name = "registry.token.request",
                event_domain = "registry",
                "requesting anonymous token"
            );
        }

        let response = request
            .send()
            .await
            .map_err(|e| Error::network(url.as_str(), e))?;
        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| Error::network(url.as_str(), e))?;

        let token: TokenResponse = serde_json::from_slice(&body)?;
        debug!(
            event_name = "registry.token.received",
            event_domain = "registry",
            status = status.as_u16(),
            "token received"
        );
        Ok(token.token)
    }

    /// Reads the current quota from the manifest endpoint's `RateLimit-*` headers.
    ///
    /// A `HEAD` request does not count against the pull limit. Any header that
    /// fails to parse aborts the whole fetch.
    pub async fn fetch_limits(&self) -> Result<RateLimitSnapshot> {
        let token = self.fetch_token().await?;
        let url = &self.endpoints.registry_url;

        let response = self
            .http
            .head(url)
            .bearer_auth(&token)
            .send()
            .await
            .map_err(|e| Error::network(url.as_str(), e))?;

        let status = response.status();
        if !status.is_success() {
            debug!(
                event_name = "registry.limits.status",
                event_domain = "registry",
                status = status.as_u16(),
                "manifest HEAD returned a non-success status"
            );
        }

        let headers = read_limit_headers(response.headers())?;
        debug!(
            event_name = "registry.limits.received",
            event_domain = "registry",
            limit = headers.limit,
            remaining = headers.remaining,
            reset = headers.reset,
            "rate-limit headers parsed"
        );
        Ok(headers.into())
    }
}

fn read_limit_headers(headers: &HeaderMap) -> Result<RateLimitHeaders> {
    Ok(RateLimitHeaders {
        limit: read_header(headers, LIMIT_HEADER)?,
        remaining: read_header(headers, REMAINING_HEADER)?,
        reset: read_header(headers, RESET_HEADER)?,
    })
}

fn read_header(headers: &HeaderMap, name: &'static str) -> Result<u64> {
    let raw = headers
        .get(name)
        .map(|value| String::from_utf8_lossy(value.as_bytes()).into_owned())
        .unwrap_or_default();

    parse_limit(&raw).inspect_err(|_| {
        debug!(
            event_name = "registry.limits.invalid_header",
            event_domain = "registry",
            header = name,
            value = raw.as_str(),
            "rate-limit header is not a number"
        );
    })
}
