pub mod orchestrator;
pub mod result;

pub use orchestrator::{MediaExtractor, Stage};
pub use result::ExtractionResult;
