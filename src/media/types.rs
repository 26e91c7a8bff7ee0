use serde::{Deserialize, Serialize};

pub const DEFAULT_MIME_TYPE: &str = "application/octet-stream";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaType {
    Image,
    Audio,
    Video,
    Document,
    Unknown,
}

impl MediaType {
    #[must_use]
    pub fn from_mime(mime: &str) -> Self {
        let Ok(parsed) = mime.trim().parse::<mime::Mime>() else {
            return Self::Unknown;
        };
        let top = parsed.type_();
        if top == mime::IMAGE {
            Self::Image
        } else if top == mime::AUDIO {
            Self::Audio
        } else if top == mime::VIDEO {
            Self::Video
        } else if top == mime::TEXT || parsed.essence_str() == mime::APPLICATION_PDF.essence_str()
        {
            Self::Document
        } else {
            Self::Unknown
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::Audio => "audio",
            Self::Video => "video",
            Self::Document => "document",
            Self::Unknown => "unknown",
        }
    }
}

/// A downloaded payload ready to hand to a reply channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FetchedMedia {
    pub mime_type: String,
    pub base64: String,
}

impl FetchedMedia {
    #[must_use]
    pub fn new(mime_type: impl Into<String>, base64: impl Into<String>) -> Self {
        Self {
            mime_type: mime_type.into(),
            base64: base64.into(),
        }
    }

    #[must_use]
    pub fn media_type(&self) -> MediaType {
        MediaType::from_mime(&self.mime_type)
    }

    /// Decoded payload size, derived from the base64 length.
    #[must_use]
    pub fn decoded_len(&self) -> usize {
        let padding = self.base64.bytes().rev().take_while(|b| *b == b'=').count();
        (self.base64.len() / 4 * 3).saturating_sub(padding)
    }
}
