//! Language-model decision making for the controlled agent

pub mod brain;
pub mod client;
pub mod context;
pub mod parser;

pub use brain::LlmBrain;
pub use client::LlmClient;
pub use context::PromptContext;
pub use parser::{parse_intent, request_intent};
