use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures_util::FutureExt;
use tracing::Instrument;

use super::result::ExtractionResult;
use crate::channels::InboundMessage;
use crate::error::ExtractionError;
use crate::links::{PatternRegistry, Platform};
use crate::media::MediaFetcher;
use crate::resolver::LinkResolver;

/// Where a message is in the pipeline. Used for logging only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum Stage {
    NoUrl,
    Classified,
    Resolving,
    Fetching,
    Delivering,
    Done,
    Errored,
}

#[derive(Debug)]
struct StageFailure {
    stage: Stage,
    error: ExtractionError,
}

impl StageFailure {
    fn new(stage: Stage, error: impl Into<ExtractionError>) -> Self {
        Self {
            stage,
            error: error.into(),
        }
    }
}

/// Classify → resolve → fetch → reply, for one inbound message at a time.
///
/// The extractor holds only immutable state, so one instance can serve any
/// number of concurrent messages behind an `Arc`.
pub struct MediaExtractor {
    registry: PatternRegistry,
    resolver: LinkResolver,
    fetcher: Arc<dyn MediaFetcher>,
}

impl MediaExtractor {
    #[must_use]
    pub fn new(resolver: LinkResolver, fetcher: Arc<dyn MediaFetcher>) -> Self {
        Self {
            registry: PatternRegistry::builtin().clone(),
            resolver,
            fetcher,
        }
    }

    #[must_use]
    pub fn with_registry(mut self, registry: PatternRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// Production wiring: the HTTP fetcher plus the Open Graph resolver for
    /// every configured platform.
    #[cfg(feature = "opengraph")]
    pub fn from_config(config: &crate::config::Config) -> anyhow::Result<Self> {
        use crate::media::BinaryFetcher;
        use crate::resolver::{OpenGraphResolver, Resolver};

        let fetcher = BinaryFetcher::new(&config.fetch)?;
        let pages: Arc<dyn Resolver> =
            Arc::new(OpenGraphResolver::new(config.resolver.timeout())?);

        let mut resolver = LinkResolver::new(config.resolver.timeout());
        for platform in &config.resolver.platforms {
            resolver.register(*platform, Arc::clone(&pages));
        }
        Ok(Self::new(resolver, Arc::new(fetcher)))
    }

    #[must_use]
    pub fn registry(&self) -> &PatternRegistry {
        &self.registry
    }

    #[must_use]
    pub fn resolver(&self) -> &LinkResolver {
        &self.resolver
    }

    /// Handle one inbound message. Never fails and never panics outward:
    /// every problem is reported through the returned result.
    pub async fn handle(&self, message: &dyn InboundMessage) -> ExtractionResult {
        let Some(body) = message.body().filter(|b| !b.trim().is_empty()) else {
            tracing::trace!(stage = %Stage::NoUrl, "message has no body");
            return ExtractionResult::skipped();
        };

        let Some(found) = self.registry.classify(body) else {
            tracing::trace!(stage = %Stage::NoUrl, "no media URL in message");
            return ExtractionResult::skipped();
        };
        let platform = found.platform;
        tracing::debug!(stage = %Stage::Classified, %platform, url = %found.url, "media URL found");

        if !self.resolver.supports(platform) {
            tracing::debug!(%platform, "no resolver registered, ignoring message");
            return ExtractionResult::skipped();
        }

        let span = tracing::info_span!("media_extraction", %platform, url = %found.url);
        let outcome = AssertUnwindSafe(
            self.run(message, platform, &found.url)
                .instrument(span.clone()),
        )
        .catch_unwind()
        .await;

        span.in_scope(|| match outcome {
            Ok(Ok(delivered)) => {
                tracing::info!(stage = %Stage::Done, delivered, "media delivered");
                ExtractionResult::delivered(platform, found.url)
            }
            Ok(Err(StageFailure { stage, error })) => {
                tracing::error!(
                    stage = %Stage::Errored,
                    failed_at = %stage,
                    kind = error.kind(),
                    error = %error,
                    "media extraction failed"
                );
                ExtractionResult::failed(platform, found.url, error.to_string())
            }
            Err(panic) => {
                let error = ExtractionError::Other(anyhow::anyhow!(panic_message(&*panic)));
                tracing::error!(
                    stage = %Stage::Errored,
                    kind = error.kind(),
                    error = %error,
                    "media extraction panicked"
                );
                ExtractionResult::failed(platform, found.url, error.to_string())
            }
        })
    }

    async fn run(
        &self,
        message: &dyn InboundMessage,
        platform: Platform,
        url: &str,
    ) -> Result<usize, StageFailure> {
        tracing::info!(stage = %Stage::Resolving, "processing {platform} URL");
        if let Err(e) = message.send_typing().await {
            tracing::warn!(error = %e, "typing indicator failed");
        }

        let links = self
            .resolver
            .resolve(url, platform)
            .await
            .map_err(|e| StageFailure::new(Stage::Resolving, e))?;

        for (index, link) in links.iter().enumerate() {
            tracing::debug!(stage = %Stage::Fetching, index, link = %link, "fetching media");
            let media = self
                .fetcher
                .fetch(link)
                .await
                .map_err(|e| StageFailure::new(Stage::Fetching, e))?;

            tracing::debug!(
                stage = %Stage::Delivering,
                index,
                mime_type = %media.mime_type,
                "delivering media"
            );
            message
                .reply(&media)
                .await
                .map_err(|e| StageFailure::new(Stage::Delivering, ExtractionError::Delivery(e)))?;
        }

        Ok(links.len())
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unexpected failure".to_string()
    }
}
