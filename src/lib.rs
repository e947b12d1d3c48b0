pub mod converter;
pub mod error;
pub mod model;

pub use converter::config::*;
pub use converter::io::*;
pub use converter::parsers::{KarParser, LineParser, LrcParser, LyricParser};
pub use converter::types::*;
pub use error::*;
pub use model::song::*;
pub use model::text_index::*;
