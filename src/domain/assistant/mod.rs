//! Assistant module - AI tool prompts and the texts shown for their results.

pub mod messages;
mod result;
mod tool;

pub use messages::{apology, is_apology, APOLOGY_MARKER, NO_RESPONSE};
pub use result::GeneratedText;
pub use tool::AiTool;
