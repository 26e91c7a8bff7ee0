use std::collections::HashSet;
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use futures_util::StreamExt;
use reqwest::Client;
use scraper::{Html, Selector};
use tokio_util::sync::CancellationToken;
use url::Url;

use super::{ResolvedLinks, Resolver};
use crate::config::schema::BROWSER_USER_AGENT;

const VIDEO_PROPERTIES: [&str; 3] = ["og:video:secure_url", "og:video:url", "og:video"];
const IMAGE_PROPERTY: &str = "og:image";

/// Post pages larger than this are not parsed.
pub const MAX_PAGE_BYTES: usize = 2 * 1_024 * 1_024;

/// Resolves a post page to the media advertised in its Open Graph tags.
///
/// Video tags win over images; when only images are present every
/// `og:image` is returned in document order, which covers carousels.
pub struct OpenGraphResolver {
    client: Client,
    max_page_bytes: usize,
}

impl OpenGraphResolver {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .user_agent(BROWSER_USER_AGENT)
            .redirect(reqwest::redirect::Policy::limited(10))
            .timeout(timeout)
            .build()
            .context("failed to build page client")?;
        Ok(Self {
            client,
            max_page_bytes: MAX_PAGE_BYTES,
        })
    }

    #[must_use]
    pub fn with_max_page_bytes(mut self, limit: usize) -> Self {
        self.max_page_bytes = limit;
        self
    }

    async fn fetch_page(&self, url: &str) -> Result<String> {
        let response = self
            .client
            .get(url)
            .header(reqwest::header::ACCEPT, "text/html,application/xhtml+xml")
            .send()
            .await
            .context("page request failed")?;
        let status = response.status();
        if !status.is_success() {
            anyhow::bail!("page returned status {status}");
        }
        if let Some(declared) = response.content_length()
            && declared > self.max_page_bytes as u64
        {
            anyhow::bail!("page exceeds {} byte limit", self.max_page_bytes);
        }

        let mut body = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.context("failed to read page body")?;
            if body.len() + chunk.len() > self.max_page_bytes {
                anyhow::bail!("page exceeds {} byte limit", self.max_page_bytes);
            }
            body.extend_from_slice(&chunk);
        }
        Ok(String::from_utf8_lossy(&body).into_owned())
    }
}

#[async_trait]
impl Resolver for OpenGraphResolver {
    async fn resolve(&self, url: &str, cancel: CancellationToken) -> Result<ResolvedLinks> {
        let base = Url::parse(url).with_context(|| format!("invalid post URL: {url}"))?;

        let html = tokio::select! {
            biased;
            () = cancel.cancelled() => anyhow::bail!("resolution cancelled"),
            page = self.fetch_page(url) => page?,
        };

        let links = media_links_from_html(&base, &html);
        if links.is_empty() {
            anyhow::bail!("no Open Graph media found on page");
        }
        Ok(ResolvedLinks::Many(links))
    }
}

fn media_links_from_html(base: &Url, html: &str) -> Vec<String> {
    let document = Html::parse_document(html);

    let videos: Vec<String> = VIDEO_PROPERTIES
        .iter()
        .flat_map(|property| meta_contents(&document, property))
        .collect();
    let candidates = if videos.is_empty() {
        meta_contents(&document, IMAGE_PROPERTY)
    } else {
        videos
    };

    let mut seen = HashSet::new();
    candidates
        .into_iter()
        .filter_map(|raw| base.join(raw.trim()).ok())
        .filter(|url| matches!(url.scheme(), "http" | "https"))
        .map(String::from)
        .filter(|url| seen.insert(url.clone()))
        .collect()
}

fn meta_contents(document: &Html, property: &str) -> Vec<String> {
    let Ok(selector) = Selector::parse(&format!(r#"meta[property="{property}"]"#)) else {
        return Vec::new();
    };
    document
        .select(&selector)
        .filter_map(|el| el.value().attr("content"))
        .filter(|content| !content.trim().is_empty())
        .map(String::from)
        .collect()
}
