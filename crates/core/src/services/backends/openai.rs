use reqwest::blocking::Client;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use crate::config::ExplainerConfig;
use crate::services::explanation::{BackendError, ExplanationBackend};

/// OpenAI-compatible chat-completions backend.
///
/// One JSON POST per prompt with a bearer credential; the first choice's message
/// content is the explanation.
pub struct OpenAiBackend {
    client: Client,
    endpoint: String,
    model: String,
    api_key: Option<String>,
}

impl OpenAiBackend {
    pub fn new(
        endpoint: impl Into<String>,
        model: impl Into<String>,
        api_key: Option<String>,
    ) -> Result<Self, BackendError> {
        let client = Client::builder()
            .build()
            .map_err(|e| BackendError::Transport(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { client, endpoint: endpoint.into(), model: model.into(), api_key })
    }

    pub fn from_config(config: &ExplainerConfig) -> Result<Self, BackendError> {
        Self::new(config.endpoint.clone(), config.model.clone(), config.api_key.clone())
    }
}

impl ExplanationBackend for OpenAiBackend {
    fn explain(&self, prompt: &str) -> Result<String, BackendError> {
        let api_key = self.api_key.as_deref().ok_or(BackendError::MissingCredential)?;

        debug!(
            endpoint = %self.endpoint,
            model = %self.model,
            prompt_len = prompt.len(),
            "sending prompt"
        );
        let response = self
            .client
            .post(&self.endpoint)
            .header("Authorization", format!("Bearer {api_key}"))
            .json(&request_body(&self.model, prompt))
            .send()
            .map_err(|e| BackendError::Transport(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .map_err(|e| BackendError::Transport(format!("failed to read response body: {e}")))?;

        match parse_chat_response(&body) {
            Err(BackendError::MalformedResponse(_)) if !status.is_success() => {
                Err(BackendError::Transport(format!("server returned status: {status}")))
            }
            other => other,
        }
    }

    fn name(&self) -> &'static str {
        "openai"
    }
}

/// Chat-completions request payload for a single user message.
pub fn request_body(model: &str, prompt: &str) -> serde_json::Value {
    json!({
        "model": model,
        "messages": [{ "role": "user", "content": prompt }],
    })
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
    #[serde(default)]
    error: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Extract the explanation from a chat-completions body.
///
/// A body carrying an `error` member is a failure even if it also has choices.
pub fn parse_chat_response(body: &str) -> Result<String, BackendError> {
    let parsed: ChatResponse = serde_json::from_str(body)
        .map_err(|e| BackendError::MalformedResponse(format!("invalid JSON: {e}")))?;

    if let Some(error) = parsed.error.filter(|e| !e.is_null()) {
        let message = error
            .get("message")
            .and_then(|m| m.as_str())
            .map(str::to_string)
            .or_else(|| error.as_str().map(str::to_string))
            .unwrap_or_else(|| error.to_string());
        return Err(BackendError::Remote(message));
    }

    parsed
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .ok_or_else(|| BackendError::MalformedResponse("missing choices[0].message.content".into()))
}
