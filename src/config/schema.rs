use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::links::Platform;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Path the config was read from - not serialized
    #[serde(skip)]
    pub config_path: Option<PathBuf>,

    /// "trace" | "debug" | "info" | "warn" | "error"
    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub fetch: FetchConfig,

    #[serde(default)]
    pub resolver: ResolverConfig,

    #[serde(default)]
    pub speech: SpeechConfig,
}

fn default_log_level() -> String {
    "info".into()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            config_path: None,
            log_level: default_log_level(),
            fetch: FetchConfig::default(),
            resolver: ResolverConfig::default(),
            speech: SpeechConfig::default(),
        }
    }
}

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.log_level.parse::<tracing::Level>().is_err() {
            return Err(ConfigError::Validation(format!(
                "unknown log_level '{}'",
                self.log_level
            )));
        }
        self.fetch.validate()?;
        self.resolver.validate()?;
        self.speech.validate()
    }
}

// ─── Binary fetch ────────────────────────────────────────────────────────────

/// HTTP identity and limits for media downloads. Built into a client once at
/// startup and shared read-only afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchConfig {
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    #[serde(default = "default_accept")]
    pub accept: String,
    #[serde(default = "default_accept_language")]
    pub accept_language: String,
    #[serde(default = "default_max_redirects")]
    pub max_redirects: usize,
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: u64,
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
    #[serde(default = "default_fetch_timeout_secs")]
    pub timeout_secs: u64,
}

pub(crate) const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

fn default_user_agent() -> String {
    BROWSER_USER_AGENT.into()
}

fn default_accept() -> String {
    "image/*, video/*".into()
}

fn default_accept_language() -> String {
    "en-US,en;q=0.9".into()
}

fn default_max_redirects() -> usize {
    10
}

fn default_max_body_bytes() -> u64 {
    50 * 1_024 * 1_024
}

fn default_connect_timeout_secs() -> u64 {
    30
}

fn default_fetch_timeout_secs() -> u64 {
    60
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            accept: default_accept(),
            accept_language: default_accept_language(),
            max_redirects: default_max_redirects(),
            max_body_bytes: default_max_body_bytes(),
            connect_timeout_secs: default_connect_timeout_secs(),
            timeout_secs: default_fetch_timeout_secs(),
        }
    }
}

impl FetchConfig {
    #[must_use]
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.max_body_bytes == 0 {
            return Err(ConfigError::Validation(
                "fetch.max_body_bytes must be greater than zero".into(),
            ));
        }
        if self.connect_timeout_secs == 0 || self.timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "fetch timeouts must be greater than zero".into(),
            ));
        }
        Ok(())
    }
}

// ─── Link resolution ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolverConfig {
    #[serde(default = "default_resolver_timeout_secs")]
    pub timeout_secs: u64,
    /// Platforms that get a resolver wired in by the host.
    #[serde(default = "default_platforms")]
    pub platforms: Vec<Platform>,
}

fn default_resolver_timeout_secs() -> u64 {
    60
}

fn default_platforms() -> Vec<Platform> {
    Platform::ALL.to_vec()
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_resolver_timeout_secs(),
            platforms: default_platforms(),
        }
    }
}

impl ResolverConfig {
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "resolver.timeout_secs must be greater than zero".into(),
            ));
        }
        Ok(())
    }
}

// ─── Speech synthesis ────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpeechConfig {
    #[serde(default)]
    pub enabled: bool,
    /// Base URL of the Gradio app serving the TTS function.
    #[serde(default = "default_speech_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_speech_api_name")]
    pub api_name: String,
    #[serde(default = "default_speech_voice")]
    pub voice: String,
    /// Bearer token for the inference host. Usually supplied via `HF_TOKEN`.
    #[serde(default, skip_serializing)]
    pub api_token: Option<String>,
    #[serde(default = "default_speech_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_speech_endpoint() -> String {
    "https://sekai966-edge-tts-text-to-speech.hf.space".into()
}

fn default_speech_api_name() -> String {
    "tts_interface".into()
}

fn default_speech_voice() -> String {
    "en-US-AvaMultilingualNeural - en-US (Female)".into()
}

fn default_speech_timeout_secs() -> u64 {
    120
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            endpoint: default_speech_endpoint(),
            api_name: default_speech_api_name(),
            voice: default_speech_voice(),
            api_token: None,
            timeout_secs: default_speech_timeout_secs(),
        }
    }
}

impl SpeechConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.enabled && self.endpoint.trim().is_empty() {
            return Err(ConfigError::Validation(
                "speech.endpoint is required when speech is enabled".into(),
            ));
        }
        if self.timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "speech.timeout_secs must be greater than zero".into(),
            ));
        }
        Ok(())
    }
}
