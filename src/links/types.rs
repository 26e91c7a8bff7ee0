use serde::{Deserialize, Serialize};

/// A media-sharing service whose post URLs we know how to recognise.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Platform {
    Instagram,
    Tiktok,
    Facebook,
}

impl Platform {
    pub const ALL: [Self; 3] = [Self::Instagram, Self::Tiktok, Self::Facebook];
}

/// A recognised post URL found in message text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedUrl {
    pub url: String,
    pub platform: Platform,
}
