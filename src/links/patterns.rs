use std::sync::LazyLock;

use regex::Regex;

use super::types::Platform;

/// One entry of the pattern registry.
#[derive(Debug, Clone)]
pub struct PlatformPattern {
    pub platform: Platform,
    pub matcher: Regex,
}

impl PlatformPattern {
    pub fn new(platform: Platform, pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            platform,
            matcher: Regex::new(pattern)?,
        })
    }
}

/// Ordered platform → URL rule table. Iteration order breaks ties when a text
/// matches more than one platform.
#[derive(Debug, Clone)]
pub struct PatternRegistry {
    patterns: Vec<PlatformPattern>,
}

const INSTAGRAM_PATTERN: &str = r"(?i)https?://(?:www\.)?(?:instagram\.com/(?:[\w.]+/)?(?:p|reels?|tv|stories)/|instagr\.am/p/)[^\s<>]+";
const TIKTOK_PATTERN: &str = r"(?i)https?://(?:(?:www|m|vm|vt)\.)?tiktok\.com/[^\s<>]+";
const FACEBOOK_PATTERN: &str =
    r"(?i)https?://(?:(?:(?:www|m|web)\.)?facebook\.com|fb\.watch)/[^\s<>]+";

static BUILTIN: LazyLock<PatternRegistry> = LazyLock::new(|| {
    let entries = [
        (Platform::Instagram, INSTAGRAM_PATTERN),
        (Platform::Tiktok, TIKTOK_PATTERN),
        (Platform::Facebook, FACEBOOK_PATTERN),
    ];
    let patterns = entries
        .into_iter()
        .filter_map(|(platform, pattern)| match PlatformPattern::new(platform, pattern) {
            Ok(entry) => Some(entry),
            Err(e) => {
                tracing::error!(%platform, error = %e, "invalid builtin URL pattern");
                None
            }
        })
        .collect();
    PatternRegistry::new(patterns)
});

impl PatternRegistry {
    #[must_use]
    pub fn new(patterns: Vec<PlatformPattern>) -> Self {
        Self { patterns }
    }

    /// Built-in registry: Instagram, TikTok, Facebook, in that order.
    #[must_use]
    pub fn builtin() -> &'static Self {
        &BUILTIN
    }

    pub fn iter(&self) -> impl Iterator<Item = &PlatformPattern> {
        self.patterns.iter()
    }

    #[must_use]
    pub fn platforms(&self) -> Vec<Platform> {
        self.patterns.iter().map(|p| p.platform).collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}
