//! Completion API client and extraction prompt.

mod client;
pub mod prompt;
pub mod types;

pub use client::ChatClient;
pub use prompt::build_extraction_prompt;

use std::future::Future;

use crate::error::LlmError;

/// Result type for completion operations.
pub type Result<T> = std::result::Result<T, LlmError>;

/// Trait for services that turn a prompt into a single text completion.
pub trait CompletionBackend {
    /// Send the prompt and return the completion text.
    fn complete(&self, prompt: &str) -> impl Future<Output = Result<String>> + Send;
}
