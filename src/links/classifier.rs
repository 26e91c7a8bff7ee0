use super::patterns::PatternRegistry;
use super::types::{ExtractedUrl, Platform};

impl PatternRegistry {
    /// Find the first recognised post URL in `text`.
    ///
    /// Platforms are tried in registry order and the first one whose rule
    /// matches anywhere in the text wins, even if another platform's URL
    /// appears earlier in the text.
    #[must_use]
    pub fn classify(&self, text: &str) -> Option<ExtractedUrl> {
        if text.trim().is_empty() {
            return None;
        }

        self.iter().find_map(|entry| {
            entry.matcher.find_iter(text).find_map(|found| {
                let url = strip_trailing_punctuation(found.as_str());
                // Trimming can leave a stub the rule no longer accepts.
                entry.matcher.is_match(url).then(|| ExtractedUrl {
                    url: url.to_string(),
                    platform: entry.platform,
                })
            })
        })
    }

    /// Platform of a single URL, tested against every rule in registry order.
    #[must_use]
    pub fn media_type_of(&self, url: &str) -> Option<Platform> {
        if url.is_empty() {
            return None;
        }
        self.iter()
            .find(|entry| entry.matcher.is_match(url))
            .map(|entry| entry.platform)
    }
}

/// Classify against the built-in registry.
#[must_use]
pub fn classify(text: &str) -> Option<ExtractedUrl> {
    PatternRegistry::builtin().classify(text)
}

#[must_use]
pub fn media_type_of(url: &str) -> Option<Platform> {
    PatternRegistry::builtin().media_type_of(url)
}

fn strip_trailing_punctuation(s: &str) -> &str {
    s.trim_end_matches(['.', ',', ';', '!', '?', ')', '"', '\''])
}
