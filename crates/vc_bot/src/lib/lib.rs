mod assistant;
pub mod cache;
pub mod config;
pub mod context;
pub mod document;
mod error;
mod llm;
pub mod parser;
pub mod prompt;
pub mod registry;
pub mod resolve;
pub mod session;
pub mod tracing;
pub mod types;
pub mod yt;

pub use assistant::{builder::AssistantBuilder, Assistant};
pub use registry::LIBRARY_SOURCE_NAME;
pub use error::Error;
pub use llm::openai;
pub use llm::completion::{CompletionParams, Completer};
