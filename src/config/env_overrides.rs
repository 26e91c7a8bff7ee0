use super::Config;

impl Config {
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(|key| std::env::var(key).ok());
    }

    pub(crate) fn apply_overrides_from(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let lookup = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(token) = lookup("MEDIARELAY_HF_TOKEN").or_else(|| lookup("HF_TOKEN")) {
            self.speech.api_token = Some(token);
        }

        if let Some(endpoint) = lookup("MEDIARELAY_SPEECH_ENDPOINT") {
            self.speech.endpoint = endpoint;
        }

        if let Some(enabled) = lookup("MEDIARELAY_SPEECH_ENABLED")
            && let Ok(enabled) = enabled.parse::<bool>()
        {
            self.speech.enabled = enabled;
        }

        if let Some(secs) = lookup("MEDIARELAY_RESOLVER_TIMEOUT_SECS")
            && let Ok(secs) = secs.parse::<u64>()
            && secs > 0
        {
            self.resolver.timeout_secs = secs;
        }

        if let Some(level) = lookup("MEDIARELAY_LOG_LEVEL") {
            self.log_level = level.to_lowercase();
        }
    }
}
