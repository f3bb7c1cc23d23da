/// Repository queried for rate-limit headers. Docker publishes it for this purpose.
pub const TEST_REPOSITORY: &str = "ratelimitpreview/test";
pub const REGISTRY_SERVICE: &str = "registry.docker.io";

const DOCKER_AUTH_BASE: &str = "https://auth.docker.io";
const DOCKER_REGISTRY_BASE: &str = "https://registry-1.docker.io";

/// Outbound URLs used by the registry client.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Endpoints {
    /// Token endpoint, queried with `service` and `scope`.
    pub auth_url: String,
    /// Manifest URL of the rate-limit test repository's `latest` tag.
    pub registry_url: String,
    pub service: String,
    pub repository: String,
}

impl Endpoints {
    /// Builds the endpoints for an auth service and a registry rooted at the given base URLs.
    pub fn new(auth_base: &str, registry_base: &str) -> Self {
        let auth_base = auth_base.trim_end_matches('/');
        let registry_base = registry_base.trim_end_matches('/');

        Endpoints {
            auth_url: format!("{auth_base}/token"),
            registry_url: format!("{registry_base}/v2/{TEST_REPOSITORY}/manifests/latest"),
            service: REGISTRY_SERVICE.to_string(),
            repository: TEST_REPOSITORY.to_string(),
        }
    }

    /// Pull-only scope for the rate-limit test repository.
    pub fn scope(&self) -> String {
        format!("repository:{}:pull", self.repository)
    }
}

impl Default for Endpoints {
    fn default() -> Self {
        Endpoints::new(DOCKER_AUTH_BASE, DOCKER_REGISTRY_BASE)
    }
}
