use std::future::Future;

/// Generation settings for a single completion call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompletionParams {
    pub max_tokens: u32,
    pub temperature: f32,
}

impl Default for CompletionParams {
    fn default() -> Self {
        Self {
            max_tokens: 350,
            temperature: 0.4,
        }
    }
}

pub trait Completer {
    const DEFAULT_MODEL: &'static str;

    type Error: Into<anyhow::Error>;

    /// Sends `prompt` to the hosted model and returns the trimmed answer.
    fn complete(
        &self,
        prompt: &str,
        max_tokens: u32,
        temperature: f32,
    ) -> impl Future<Output = Result<String, Self::Error>> + Send;
}
