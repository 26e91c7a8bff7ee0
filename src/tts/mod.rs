//! Text-to-speech through a hosted Gradio app.
//!
//! The remote call is a two-step Gradio queue request: submit the inputs and
//! receive an event id, then read the event stream until the `complete`
//! event carries the generated audio file. The file itself is downloaded with
//! the regular media fetcher.

pub mod text;

pub use text::{MIN_VOICE_CHARS, clean_text, should_generate_voice};

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::{Client, RequestBuilder};
use serde::Deserialize;
use serde_json::Value;

use crate::config::SpeechConfig;
use crate::error::SpeechError;
use crate::media::{FetchedMedia, MediaFetcher};

#[derive(Debug, Deserialize)]
struct SubmitResponse {
    event_id: String,
}

pub struct SpeechSynthesizer {
    client: Client,
    endpoint: String,
    api_name: String,
    voice: String,
    api_token: Option<String>,
    fetcher: Arc<dyn MediaFetcher>,
}

impl SpeechSynthesizer {
    pub fn new(config: &SpeechConfig, fetcher: Arc<dyn MediaFetcher>) -> Result<Self, SpeechError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| {
                tracing::error!(error = %e, "speech client setup failed");
                SpeechError::Failed
            })?;

        Ok(Self {
            client,
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            api_name: config.api_name.trim_matches('/').to_string(),
            voice: config.voice.clone(),
            api_token: config.api_token.clone(),
            fetcher,
        })
    }

    /// Convert `text` to an audio attachment.
    ///
    /// Any failure (empty input, remote error, download error) is logged and
    /// reported as [`SpeechError::Failed`].
    pub async fn text_to_speech(&self, text: &str) -> Result<FetchedMedia, SpeechError> {
        match self.synthesize(text).await {
            Ok(media) => Ok(media),
            Err(e) => {
                tracing::error!(error = %format!("{e:#}"), "TTS error");
                Err(SpeechError::Failed)
            }
        }
    }

    async fn synthesize(&self, text: &str) -> Result<FetchedMedia> {
        let clean = clean_text(text);
        if clean.is_empty() {
            anyhow::bail!("No text to convert after cleaning");
        }

        let event_id = self.submit(&clean).await?;
        let audio_url = self.await_audio_url(&event_id).await?;
        tracing::debug!(event_id = %event_id, "TTS generation successful");

        let media = self
            .fetcher
            .fetch(&audio_url)
            .await
            .context("failed to download generated audio")?;
        Ok(media)
    }

    fn call_url(&self) -> String {
        format!("{}/gradio_api/call/{}", self.endpoint, self.api_name)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.api_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn submit(&self, text: &str) -> Result<String> {
        let body = serde_json::json!({ "data": [text, self.voice] });
        let response = self
            .authorize(self.client.post(self.call_url()))
            .json(&body)
            .send()
            .await
            .context("speech request failed")?;

        let status = response.status();
        if !status.is_success() {
            anyhow::bail!("speech endpoint returned status {status}");
        }

        let submitted: SubmitResponse = response
            .json()
            .await
            .context("malformed speech submit response")?;
        Ok(submitted.event_id)
    }

    async fn await_audio_url(&self, event_id: &str) -> Result<String> {
        let url = format!("{}/{event_id}", self.call_url());
        let response = self
            .authorize(self.client.get(url))
            .send()
            .await
            .context("speech result request failed")?;

        let status = response.status();
        if !status.is_success() {
            anyhow::bail!("speech result returned status {status}");
        }

        let stream = response.text().await.context("failed to read speech result")?;
        let output = parse_event_stream(&stream)?;
        audio_url_from_output(&self.endpoint, &output)
    }
}

/// Pull the `complete` payload out of a server-sent event stream body.
fn parse_event_stream(body: &str) -> Result<Value> {
    let mut event = "";
    for line in body.lines() {
        if let Some(name) = line.strip_prefix("event:") {
            event = name.trim();
        } else if let Some(data) = line.strip_prefix("data:") {
            let data = data.trim();
            match event {
                "complete" => {
                    return serde_json::from_str(data).context("malformed speech result payload");
                }
                "error" => anyhow::bail!("speech endpoint reported an error: {data}"),
                _ => {}
            }
        }
    }
    anyhow::bail!("speech result stream ended without output")
}

fn audio_url_from_output(endpoint: &str, output: &Value) -> Result<String> {
    let audio = output
        .as_array()
        .and_then(|items| items.first())
        .context("speech result has no outputs")?;

    if let Some(url) = audio.get("url").and_then(Value::as_str) {
        return Ok(url.to_string());
    }
    if let Some(path) = audio.get("path").and_then(Value::as_str) {
        return Ok(format!("{endpoint}/gradio_api/file={path}"));
    }
    anyhow::bail!("speech result carries no audio file")
}
