use std::future::Future;

use async_trait::async_trait;
use tokio::io::{self, AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tokio::task::JoinSet;

use super::traits::InboundMessage;
use crate::media::FetchedMedia;

/// A line of stdin, treated as one chat message.
#[derive(Debug, Clone)]
pub struct CliMessage {
    pub id: u64,
    pub content: String,
}

impl CliMessage {
    pub fn new(id: u64, content: impl Into<String>) -> Self {
        Self {
            id,
            content: content.into(),
        }
    }
}

/// Human-readable one-liner for a media reply.
#[must_use]
pub fn describe_media(media: &FetchedMedia) -> String {
    format!(
        "[media] {} ({}, {} bytes)",
        media.mime_type,
        media.media_type().as_str(),
        media.decoded_len()
    )
}

#[async_trait]
impl InboundMessage for CliMessage {
    fn body(&self) -> Option<&str> {
        Some(&self.content)
    }

    async fn reply(&self, media: &FetchedMedia) -> anyhow::Result<()> {
        println!("#{} {}", self.id, describe_media(media));
        Ok(())
    }

    async fn send_typing(&self) -> anyhow::Result<()> {
        tracing::debug!(message_id = self.id, "typing...");
        Ok(())
    }
}

/// Read stdin line by line and forward messages until EOF or `/quit`.
pub async fn listen(tx: mpsc::Sender<CliMessage>) -> anyhow::Result<()> {
    let reader = BufReader::new(io::stdin());
    let mut lines = reader.lines();
    let mut next_id = 0_u64;

    while let Some(line) = lines.next_line().await? {
        let line = line.trim().to_string();
        if line.is_empty() {
            continue;
        }
        if line == "/quit" || line == "/exit" {
            break;
        }

        next_id += 1;
        if tx.send(CliMessage::new(next_id, line)).await.is_err() {
            break;
        }
    }
    Ok(())
}

/// Run `handler` on every received message as its own task, reaping finished
/// tasks as new messages arrive. Waits for the in-flight ones once `rx`
/// closes and returns the most tasks held at any one time.
pub async fn dispatch<F, Fut>(mut rx: mpsc::Receiver<CliMessage>, handler: F) -> usize
where
    F: Fn(CliMessage) -> Fut,
    Fut: Future<Output = ()> + Send + 'static,
{
    let mut tasks = JoinSet::new();
    let mut peak = 0;

    while let Some(message) = rx.recv().await {
        while let Some(done) = tasks.try_join_next() {
            if let Err(e) = done {
                tracing::warn!(error = %e, "message task failed");
            }
        }
        tasks.spawn(handler(message));
        peak = peak.max(tasks.len());
    }

    while let Some(done) = tasks.join_next().await {
        if let Err(e) = done {
            tracing::warn!(error = %e, "message task failed");
        }
    }
    peak
}
