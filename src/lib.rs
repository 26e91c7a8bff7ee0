#![warn(clippy::all, clippy::pedantic)]
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::return_self_not_must_use
)]

pub mod channels;
pub mod config;
pub mod error;
pub mod extraction;
pub mod links;
pub mod media;
pub mod resolver;
pub mod tts;

pub use config::Config;
pub use error::{ConfigError, ExtractionError, FetchError, SpeechError};
pub use extraction::{ExtractionResult, MediaExtractor};
pub use links::{ExtractedUrl, PatternRegistry, Platform, classify, media_type_of};
pub use media::{BinaryFetcher, FetchedMedia, MediaFetcher};
pub use resolver::{LinkResolver, ResolvedLinks, Resolver};
