//! Live adapter for the `LlmClient` port using the OpenAI chat completions API.

use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::error::PortError;
use crate::ports::llm::{CompletionFuture, CompletionRequest, CompletionResponse, LlmClient};

const OPENAI_BASE_URL: &str = "https://api.openai.com";

/// Live LLM client that calls an OpenAI-compatible chat completions endpoint.
pub struct OpenAiClient {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl OpenAiClient {
    /// Creates a client for `model` against the public OpenAI API.
    #[must_use]
    pub fn new(model: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self::with_base_url(model, api_key, OPENAI_BASE_URL)
    }

    /// Creates a client against a custom OpenAI-compatible base URL.
    #[must_use]
    pub fn with_base_url(
        model: impl Into<String>,
        api_key: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            base_url: base_url.into(),
            model: model.into(),
        }
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
    stream: bool,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
    #[serde(default)]
    usage: Option<ChatUsage>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Deserialize)]
struct ChatUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
}

#[derive(Deserialize)]
struct ChatError {
    error: ChatErrorDetail,
}

#[derive(Deserialize)]
struct ChatErrorDetail {
    message: String,
}

fn chat_body<'a>(model: &'a str, request: &'a CompletionRequest) -> ChatRequest<'a> {
    ChatRequest {
        model,
        messages: vec![ChatMessage { role: "user", content: &request.prompt }],
        temperature: request.temperature,
        max_tokens: request.max_tokens,
        stream: false,
    }
}

impl LlmClient for OpenAiClient {
    fn complete(&self, request: &CompletionRequest) -> CompletionFuture<'_> {
        let request = request.clone();

        Box::pin(async move {
            let body = chat_body(&self.model, &request);

            let response = self
                .client
                .post(format!("{}/v1/chat/completions", self.base_url))
                .bearer_auth(&self.api_key)
                .json(&body)
                .send()
                .await
                .map_err(|e| -> PortError { format!("OpenAI API request failed: {e}").into() })?;

            let status = response.status();
            let response_text = response.text().await.map_err(|e| -> PortError {
                format!("Failed to read OpenAI API response: {e}").into()
            })?;

            if !status.is_success() {
                let msg = serde_json::from_str::<ChatError>(&response_text)
                    .map(|e| e.error.message)
                    .unwrap_or(response_text);
                return Err(format!("OpenAI API error ({}): {msg}", status.as_u16()).into());
            }

            let api_response: ChatResponse =
                serde_json::from_str(&response_text).map_err(|e| -> PortError {
                    format!("Failed to parse OpenAI API response: {e}").into()
                })?;

            let text = api_response
                .choices
                .into_iter()
                .next()
                .and_then(|choice| choice.message.content)
                .unwrap_or_default();
            let (prompt_tokens, completion_tokens) = api_response
                .usage
                .map_or((0, 0), |usage| (usage.prompt_tokens, usage.completion_tokens));

            Ok(CompletionResponse { text, prompt_tokens, completion_tokens })
        })
    }

    fn model(&self) -> &str {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_body_uses_chat_completion_fields() {
        let request = CompletionRequest::new("write code", 32);

        let json = serde_json::to_value(chat_body("gpt-4o-mini", &request)).unwrap();
        assert_eq!(json["model"], "gpt-4o-mini");
        assert_eq!(json["max_tokens"], 32);
        assert_eq!(json["temperature"], 0.0);
        assert_eq!(json["stream"], false);
        assert!(json.get("max_completion_tokens").is_none());
        assert_eq!(json["messages"].as_array().unwrap().len(), 1);
        assert_eq!(json["messages"][0]["role"], "user");
        assert_eq!(json["messages"][0]["content"], "write code");
    }

    #[test]
    fn first_choice_content_is_used() {
        let raw = r#"{"choices":[{"index":0,"message":{"role":"assistant","content":"x = 1"},
            "finish_reason":"stop"}],"usage":{"prompt_tokens":5,"completion_tokens":2,"total_tokens":7}}"#;
        let parsed: ChatResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.choices[0].message.content.as_deref(), Some("x = 1"));
        assert_eq!(parsed.usage.unwrap().completion_tokens, 2);
    }
}
