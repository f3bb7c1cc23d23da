use std::time::Duration;

use figment::providers::{Env, Format, Serialized, Yaml};
use figment::Figment;
use serde::{Deserialize, Serialize};

use super::lenient;
use super::logging::LoggingConfig;

/// Port used when `exporter_port` is unset or empty.
pub const DEFAULT_PORT: u16 = 8881;

/// Prefix of the environment variables read at start-up.
pub const ENV_PREFIX: &str = "DOCKERHUB_";

/// Keys read verbatim from the environment instead of through figment's value parser.
const CREDENTIAL_KEYS: [&str; 2] = ["username", "password"];

/// Exporter configuration, read once at start-up and never mutated.
#[derive(Deserialize, Serialize, Clone)]
pub struct ExporterConfig {
    /// Optional Docker Hub username for the token request.
    #[serde(default, deserialize_with = "lenient::optional_string")]
    pub username: Option<String>,
    /// Optional Docker Hub password or access token for the token request.
    #[serde(default, deserialize_with = "lenient::optional_string", skip_serializing)]
    pub password: Option<String>,
    /// Listen port, 8881 when unset or empty.
    #[serde(default = "default_port", deserialize_with = "lenient::port")]
    pub exporter_port: u16,
    /// Upper bound for each outbound request. Unset means no timeout.
    #[serde(default)]
    pub timeout_ms: Option<u64>,
    #[serde(default)]
    pub logging: LoggingConfig,
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

impl Default for ExporterConfig {
    fn default() -> Self {
        ExporterConfig {
            username: None,
            password: None,
            exporter_port: DEFAULT_PORT,
            timeout_ms: None,
            logging: LoggingConfig::default(),
        }
    }
}

impl ExporterConfig {
    pub fn credentials(&self) -> Credentials {
        Credentials {
            username: self.username.clone(),
            password: self.password.clone(),
        }
    }

    /// Listen address on all interfaces.
    pub fn bind_address(&self) -> String {
        format!("0.0.0.0:{}", self.exporter_port)
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_ms.map(Duration::from_millis)
    }
}

impl std::fmt::Debug for ExporterConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExporterConfig")
            .field("credentials", &self.credentials())
            .field("exporter_port", &self.exporter_port)
            .field("timeout_ms", &self.timeout_ms)
            .field("logging", &self.logging)
            .finish()
    }
}

/// Optional basic-auth credentials for the token endpoint.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    pub username: Option<String>,
    pub password: Option<String>,
}

impl Credentials {
    /// Returns the pair only when both parts are present and non-empty.
    pub fn basic_auth(&self) -> Option<(&str, &str)> {
        match (self.username.as_deref(), self.password.as_deref()) {
            (Some(username), Some(password)) if !username.is_empty() && !password.is_empty() => {
                Some((username, password))
            }
            _ => None,
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Layered sources: `./config.yaml` if present, then `DOCKERHUB_*` variables.
///
/// Nested keys use a double underscore, e.g. `DOCKERHUB_LOGGING__LEVEL`.
/// `DOCKERHUB_USERNAME` and `DOCKERHUB_PASSWORD` are always taken as strings,
/// so `0123` or `[secret]` reach the token request unchanged.
pub fn config_sources() -> Figment {
    let mut figment = Figment::new()
        .merge(Yaml::file("./config.yaml"))
        .merge(Env::prefixed(ENV_PREFIX).split("__").ignore(&CREDENTIAL_KEYS));

    for key in CREDENTIAL_KEYS {
        let var = format!("{}{}", ENV_PREFIX, key.to_uppercase());
        if let Some(value) = Env::var(&var) {
            figment = figment.merge(Serialized::default(key, value));
        }
    }

    figment
}

pub fn from_figment(figment: &Figment) -> Result<ExporterConfig, figment::Error> {
    figment.extract::<ExporterConfig>()
}

/// Load the configuration, exiting the process if it is invalid.
pub fn load_config() -> ExporterConfig {
    match from_figment(&config_sources()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error loading configuration: {}", e);
            std::process::exit(1);
        }
    }
}
