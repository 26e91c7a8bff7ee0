#[cfg(feature = "opengraph")]
pub mod opengraph;

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::error::ExtractionError;
use crate::links::Platform;

#[cfg(feature = "opengraph")]
pub use opengraph::OpenGraphResolver;

/// What a resolver hands back: one direct URL, or an ordered list for
/// multi-media posts. Both shapes behave identically downstream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedLinks {
    One(String),
    Many(Vec<String>),
}

impl ResolvedLinks {
    #[must_use]
    pub fn into_vec(self) -> Vec<String> {
        match self {
            Self::One(url) => vec![url],
            Self::Many(urls) => urls,
        }
    }
}

impl From<String> for ResolvedLinks {
    fn from(url: String) -> Self {
        Self::One(url)
    }
}

impl From<&str> for ResolvedLinks {
    fn from(url: &str) -> Self {
        Self::One(url.to_string())
    }
}

impl From<Vec<String>> for ResolvedLinks {
    fn from(urls: Vec<String>) -> Self {
        Self::Many(urls)
    }
}

/// Platform-specific extractor turning a post URL into direct media URLs.
///
/// Implementations may scrape, call APIs or spawn work of their own. `cancel`
/// fires when the caller stops waiting; anything spawned should watch it.
#[async_trait]
pub trait Resolver: Send + Sync {
    async fn resolve(&self, url: &str, cancel: CancellationToken)
    -> anyhow::Result<ResolvedLinks>;
}

pub const DEFAULT_RESOLVE_TIMEOUT: Duration = Duration::from_secs(60);

/// Enum-keyed resolver table with a hard wall-clock bound per call.
#[derive(Clone)]
pub struct LinkResolver {
    resolvers: HashMap<Platform, Arc<dyn Resolver>>,
    timeout: Duration,
}

impl LinkResolver {
    #[must_use]
    pub fn new(timeout: Duration) -> Self {
        Self {
            resolvers: HashMap::new(),
            timeout,
        }
    }

    #[must_use]
    pub fn with_resolver(mut self, platform: Platform, resolver: Arc<dyn Resolver>) -> Self {
        self.register(platform, resolver);
        self
    }

    pub fn register(&mut self, platform: Platform, resolver: Arc<dyn Resolver>) {
        self.resolvers.insert(platform, resolver);
    }

    #[must_use]
    pub fn supports(&self, platform: Platform) -> bool {
        self.resolvers.contains_key(&platform)
    }

    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Resolve `url` with the resolver registered for `platform`.
    ///
    /// If the bound elapses first the resolver future is dropped and its
    /// cancellation token fired; the result is always `Timeout`, whatever the
    /// resolver would have produced later.
    pub async fn resolve(&self, url: &str, platform: Platform) -> Result<Vec<String>, ExtractionError> {
        let resolver = self
            .resolvers
            .get(&platform)
            .ok_or(ExtractionError::UnsupportedPlatform(platform))?;

        let cancel = CancellationToken::new();
        let outcome = tokio::time::timeout(self.timeout, resolver.resolve(url, cancel.clone())).await;

        let links = match outcome {
            Ok(Ok(links)) => links.into_vec(),
            Ok(Err(source)) => {
                tracing::error!(%platform, url, error = %source, "media extraction failed");
                return Err(ExtractionError::Extraction { platform, source });
            }
            Err(_) => {
                cancel.cancel();
                tracing::error!(
                    %platform,
                    url,
                    timeout_secs = self.timeout.as_secs(),
                    "media extraction timed out"
                );
                return Err(ExtractionError::Timeout {
                    platform,
                    timeout: self.timeout,
                });
            }
        };

        if links.is_empty() {
            return Err(ExtractionError::Extraction {
                platform,
                source: anyhow::anyhow!("resolver returned no media links"),
            });
        }

        tracing::debug!(%platform, url, links = links.len(), "media links resolved");
        Ok(links)
    }
}

impl Default for LinkResolver {
    fn default() -> Self {
        Self::new(DEFAULT_RESOLVE_TIMEOUT)
    }
}
