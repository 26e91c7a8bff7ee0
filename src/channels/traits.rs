use async_trait::async_trait;

use crate::media::FetchedMedia;

/// An inbound chat message as the extraction pipeline sees it.
///
/// Transports implement this for their own message type. `reply` posts media
/// back into the conversation the message came from.
#[async_trait]
pub trait InboundMessage: Send + Sync {
    /// Message text, if the message has any.
    fn body(&self) -> Option<&str>;

    /// Reply to this message with a media attachment.
    async fn reply(&self, media: &FetchedMedia) -> anyhow::Result<()>;

    /// Show a "typing" indicator in the originating conversation.
    async fn send_typing(&self) -> anyhow::Result<()> {
        Ok(())
    }
}
