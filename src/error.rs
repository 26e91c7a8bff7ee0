use std::time::Duration;

use thiserror::Error;

use crate::links::Platform;

// ─── Extraction pipeline errors ──────────────────────────────────────────────

/// Everything that can stop a message on its way from link to reply.
///
/// The orchestrator folds every variant into an `ExtractionResult`; none of
/// these ever reach the host as a failure.
#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("no resolver available for platform: {0}")]
    UnsupportedPlatform(Platform),

    #[error("{platform} media extraction timed out after {}s", .timeout.as_secs())]
    Timeout {
        platform: Platform,
        timeout: Duration,
    },

    #[error("{platform} media extraction failed: {source}")]
    Extraction {
        platform: Platform,
        #[source]
        source: anyhow::Error,
    },

    #[error("fetch: {0}")]
    Fetch(#[from] FetchError),

    #[error("reply delivery failed: {0}")]
    Delivery(#[source] anyhow::Error),

    // ── Generic fallthrough ─────────────────────────────────────────────
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ExtractionError {
    /// Short machine-friendly name, used as a log field.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::UnsupportedPlatform(_) => "unsupported_platform",
            Self::Timeout { .. } => "timeout",
            Self::Extraction { .. } => "extraction",
            Self::Fetch(_) => "fetch",
            Self::Delivery(_) => "delivery",
            Self::Other(_) => "generic",
        }
    }
}

// ─── Binary fetch errors ─────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("invalid media URL: {0}")]
    InvalidUrl(String),

    #[error("unexpected status {status} from {url}")]
    Status { status: u16, url: String },

    #[error("response exceeds {limit} byte limit (received {received} bytes)")]
    TooLarge { limit: u64, received: u64 },

    #[error("redirect limit exceeded for {0}")]
    TooManyRedirects(String),

    #[error("request timed out for {0}")]
    Timeout(String),

    #[error("http client setup failed: {0}")]
    Client(String),

    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
}

impl FetchError {
    /// Classify a transport error raised while talking to `url`.
    pub(crate) fn from_transport(url: &str, err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout(url.to_string())
        } else if err.is_redirect() {
            Self::TooManyRedirects(url.to_string())
        } else {
            Self::Request(err)
        }
    }
}

// ─── Speech synthesis errors ─────────────────────────────────────────────────

/// Speech synthesis fails uniformly; the cause is logged, not surfaced.
#[derive(Debug, Error)]
pub enum SpeechError {
    #[error("Failed to generate speech")]
    Failed,
}

// ─── Config errors ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load config: {0}")]
    Load(String),

    #[error("validation failed: {0}")]
    Validation(String),

    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}
