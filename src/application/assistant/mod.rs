//! Assistant handlers - generative text gateway and the AI tools.

mod gateway;
mod tools;

pub use gateway::GenerativeTextGateway;
pub use tools::{AiTools, ToolOutput};
