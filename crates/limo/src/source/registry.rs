use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration as StdDuration;

use super::errors::{Result, SourceError};
use super::not_found::NotFound;
use super::types::StarSource;

/// Options used when building the default adapters.
#[derive(Debug, Clone)]
pub struct SourceOptions {
    /// Per-request timeout.
    pub timeout: StdDuration,
    /// Skip TLS certificate verification (self-hosted services).
    pub insecure: bool,
    /// GitHub API base URL.
    pub github_api_url: String,
    /// GitLab host, with or without scheme.
    pub gitlab_host: String,
}

impl Default for SourceOptions {
    fn default() -> Self {
        Self {
            timeout: StdDuration::from_secs(30),
            insecure: false,
            github_api_url: "https://api.github.com".to_string(),
            gitlab_host: "gitlab.com".to_string(),
        }
    }
}

/// The set of star sources available to this process.
///
/// Built once at start-up and passed to whatever needs to look a service up.
#[derive(Clone, Default)]
pub struct ServiceRegistry {
    sources: BTreeMap<String, Arc<dyn StarSource>>,
}

impl ServiceRegistry {
    /// An empty registry. Every lookup resolves to [`NotFound`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a source under its own name, replacing any previous entry.
    #[must_use]
    pub fn with(mut self, source: Arc<dyn StarSource>) -> Self {
        self.register(source);
        self
    }

    pub fn register(&mut self, source: Arc<dyn StarSource>) {
        self.sources.insert(source.name().to_lowercase(), source);
    }

    /// Registry with every adapter compiled into this build, talking HTTP
    /// through reqwest.
    #[cfg(any(feature = "github", feature = "gitlab"))]
    pub fn with_defaults(options: &SourceOptions) -> Result<Self> {
        use crate::http::reqwest_transport::ReqwestTransport;

        let transport = ReqwestTransport::with_options(options.timeout, options.insecure)
            .map_err(|e| SourceError::network(e.to_string()))?;
        let transport: Arc<dyn crate::http::HttpTransport> = Arc::new(transport);

        #[allow(unused_mut)]
        let mut registry = Self::new();

        #[cfg(feature = "github")]
        registry.register(Arc::new(crate::github::GitHubClient::new(
            &options.github_api_url,
            Arc::clone(&transport),
        )));

        #[cfg(feature = "gitlab")]
        registry.register(Arc::new(crate::gitlab::GitLabClient::new(
            &options.gitlab_host,
            Arc::clone(&transport),
        )));

        Ok(registry)
    }

    /// Look up a source by name, case-insensitively. Unknown names resolve to
    /// [`NotFound`] so callers always hold a usable source.
    pub fn for_name(&self, name: &str) -> Arc<dyn StarSource> {
        self.try_for_name(name)
            .unwrap_or_else(|_| Arc::new(NotFound) as Arc<dyn StarSource>)
    }

    /// Look up a source by name, case-insensitively.
    ///
    /// # Errors
    /// Returns [`SourceError::UnknownService`] when nothing is registered
    /// under `name`.
    pub fn try_for_name(&self, name: &str) -> Result<Arc<dyn StarSource>> {
        self.sources
            .get(&name.to_lowercase())
            .cloned()
            .ok_or_else(|| SourceError::unknown_service(name))
    }

    /// Registered names in sorted order.
    pub fn names(&self) -> Vec<&str> {
        self.sources.keys().map(String::as_str).collect()
    }
}
