pub mod cli;
pub mod traits;

pub use cli::{CliMessage, describe_media};
pub use traits::InboundMessage;
