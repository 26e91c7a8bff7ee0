use async_trait::async_trait;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use futures_util::StreamExt;
use reqwest::header::{self, HeaderMap, HeaderValue};
use reqwest::{Client, redirect};
use url::Url;

use super::types::{DEFAULT_MIME_TYPE, FetchedMedia};
use crate::config::FetchConfig;
use crate::error::FetchError;

/// Downloads a media URL into a transport-ready payload.
#[async_trait]
pub trait MediaFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<FetchedMedia, FetchError>;
}

/// HTTP fetcher with a browser-like identity and hard size/time limits.
///
/// The underlying client is built once from [`FetchConfig`] and is never
/// reconfigured, so one instance can be shared across concurrent messages.
pub struct BinaryFetcher {
    client: Client,
    max_body_bytes: u64,
}

impl BinaryFetcher {
    pub fn new(config: &FetchConfig) -> Result<Self, FetchError> {
        let client = Client::builder()
            .default_headers(default_headers(config)?)
            .redirect(redirect::Policy::limited(config.max_redirects))
            .connect_timeout(config.connect_timeout())
            .timeout(config.timeout())
            .build()
            .map_err(|e| FetchError::Client(e.to_string()))?;

        Ok(Self {
            client,
            max_body_bytes: config.max_body_bytes,
        })
    }

    #[must_use]
    pub fn max_body_bytes(&self) -> u64 {
        self.max_body_bytes
    }

    fn too_large(&self, received: u64) -> FetchError {
        FetchError::TooLarge {
            limit: self.max_body_bytes,
            received,
        }
    }
}

fn default_headers(config: &FetchConfig) -> Result<HeaderMap, FetchError> {
    let value = |raw: &str| {
        HeaderValue::from_str(raw).map_err(|e| FetchError::Client(format!("bad header value: {e}")))
    };

    let mut headers = HeaderMap::new();
    headers.insert(header::USER_AGENT, value(&config.user_agent)?);
    headers.insert(header::ACCEPT, value(&config.accept)?);
    headers.insert(header::ACCEPT_LANGUAGE, value(&config.accept_language)?);
    headers.insert(header::CONNECTION, HeaderValue::from_static("keep-alive"));
    Ok(headers)
}

fn parse_media_url(raw: &str) -> Result<Url, FetchError> {
    let url = Url::parse(raw.trim()).map_err(|_| FetchError::InvalidUrl(raw.to_string()))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        _ => Err(FetchError::InvalidUrl(raw.to_string())),
    }
}

#[async_trait]
impl MediaFetcher for BinaryFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchedMedia, FetchError> {
        let target = parse_media_url(url)?;

        let response = self
            .client
            .get(target)
            .send()
            .await
            .map_err(|e| FetchError::from_transport(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        if let Some(declared) = response.content_length()
            && declared > self.max_body_bytes
        {
            return Err(self.too_large(declared));
        }

        let mime_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .unwrap_or(DEFAULT_MIME_TYPE)
            .to_string();

        let capacity = response
            .content_length()
            .map_or(0, |len| usize::try_from(len).unwrap_or(0));
        let mut body = Vec::with_capacity(capacity);
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| FetchError::from_transport(url, e))?;
            let received = (body.len() + chunk.len()) as u64;
            if received > self.max_body_bytes {
                return Err(self.too_large(received));
            }
            body.extend_from_slice(&chunk);
        }

        tracing::debug!(
            url,
            mime_type = %mime_type,
            bytes = body.len(),
            "media payload downloaded"
        );

        Ok(FetchedMedia::new(mime_type, STANDARD.encode(&body)))
    }
}
