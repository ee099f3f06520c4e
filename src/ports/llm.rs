//! LLM client port for code-generation completions.

use std::future::Future;
use std::pin::Pin;

use crate::error::PortError;

/// Boxed future type alias used by [`LlmClient`] to keep the trait dyn-compatible.
pub type CompletionFuture<'a> =
    Pin<Box<dyn Future<Output = Result<CompletionResponse, PortError>> + Send + 'a>>;

/// A request to generate a completion from an LLM.
///
/// The model is fixed when the client is constructed, so the request only
/// carries the text and sampling limits.
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    /// The user prompt to send.
    pub prompt: String,
    /// Maximum number of tokens to generate.
    pub max_tokens: u32,
    /// Sampling temperature.
    pub temperature: f32,
}

impl CompletionRequest {
    /// Creates a deterministic (temperature 0) request for the given prompt.
    #[must_use]
    pub fn new(prompt: impl Into<String>, max_tokens: u32) -> Self {
        Self { prompt: prompt.into(), max_tokens, temperature: 0.0 }
    }
}

/// The response from an LLM completion call.
#[derive(Debug, Clone, Default)]
pub struct CompletionResponse {
    /// The generated text.
    pub text: String,
    /// Number of prompt tokens consumed.
    pub prompt_tokens: u32,
    /// Number of completion tokens generated.
    pub completion_tokens: u32,
}

/// Sends completion requests to a language model.
pub trait LlmClient: Send + Sync {
    /// Generates a completion for the given request.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails (network, auth, rate-limit, etc.).
    fn complete(&self, request: &CompletionRequest) -> CompletionFuture<'_>;

    /// The model this client talks to, for log output.
    fn model(&self) -> &str;
}
