//! Live adapters for real external interactions.

pub mod filesystem;
pub mod llm;
pub mod openai;

use std::env;

use crate::error::SviError;
use crate::ports::LlmClient;

/// Model used when neither `--model` nor `SVI_MODEL` names one.
pub const DEFAULT_MODEL: &str = "claude-sonnet-4-20250514";

/// Which provider serves a given model name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    /// Anthropic messages API (`claude*`).
    Anthropic,
    /// OpenAI chat completions API (`gpt*`).
    OpenAi,
}

impl Provider {
    /// Picks a provider from the model-name prefix.
    ///
    /// # Errors
    ///
    /// Returns [`SviError::BackendConfig`] for an empty or unknown model name.
    pub fn for_model(model: &str) -> Result<Self, SviError> {
        let lower = model.trim().to_ascii_lowercase();
        if lower.starts_with("claude") {
            Ok(Self::Anthropic)
        } else if lower.starts_with("gpt") {
            Ok(Self::OpenAi)
        } else if lower.is_empty() {
            Err(SviError::BackendConfig("no model name given".into()))
        } else {
            Err(SviError::BackendConfig(format!("unknown model: {model}")))
        }
    }

    /// Environment variable holding this provider's API key.
    #[must_use]
    pub fn key_var(self) -> &'static str {
        match self {
            Self::Anthropic => "ANTHROPIC_API_KEY",
            Self::OpenAi => "OPENAI_API_KEY",
        }
    }
}

/// Builds the live backend for `model`.
///
/// `api_key` takes precedence over the provider's environment variable.
///
/// # Errors
///
/// Returns [`SviError::BackendConfig`] when the model is unknown or no API
/// key is available.
pub fn backend_for(model: &str, api_key: Option<&str>) -> Result<Box<dyn LlmClient>, SviError> {
    let provider = Provider::for_model(model)?;
    let key = match api_key.filter(|k| !k.trim().is_empty()) {
        Some(key) => key.to_string(),
        None => env::var(provider.key_var())
            .ok()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| {
                SviError::BackendConfig(format!("{} is not set", provider.key_var()))
            })?,
    };

    Ok(match provider {
        Provider::Anthropic => Box::new(llm::AnthropicClient::new(model.trim(), key)),
        Provider::OpenAi => Box::new(openai::OpenAiClient::new(model.trim(), key)),
    })
}
