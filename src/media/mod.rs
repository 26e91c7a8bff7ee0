pub mod fetcher;
pub mod types;

pub use fetcher::{BinaryFetcher, MediaFetcher};
pub use types::{DEFAULT_MIME_TYPE, FetchedMedia, MediaType};
