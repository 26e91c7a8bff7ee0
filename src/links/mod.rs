pub mod classifier;
pub mod patterns;
pub mod types;

pub use classifier::{classify, media_type_of};
pub use patterns::{PatternRegistry, PlatformPattern};
pub use types::{ExtractedUrl, Platform};
