use serde::{Deserialize, Serialize};

use crate::links::Platform;

/// Terminal outcome of handling one message. Exactly one is produced per
/// call; failures are carried in `error` rather than raised.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractionResult {
    pub processed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media_type: Option<Platform>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ExtractionResult {
    /// Nothing to do for this message. Not an error.
    #[must_use]
    pub fn skipped() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn delivered(platform: Platform, url: impl Into<String>) -> Self {
        Self {
            processed: true,
            media_type: Some(platform),
            url: Some(url.into()),
            error: None,
        }
    }

    /// A classified message that did not make it to delivery.
    ///
    /// Besides `error`, the JSON keeps `mediaType` and `url` so consumers can
    /// tell which link failed. Readers expecting only `{processed, error}` can
    /// ignore the extra keys.
    #[must_use]
    pub fn failed(platform: Platform, url: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            processed: false,
            media_type: Some(platform),
            url: Some(url.into()),
            error: Some(error.into()),
        }
    }
}
