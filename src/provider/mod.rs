mod gemini;
mod ollama;
mod openai;

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

use crate::config::{ProviderConfig, ProviderKind};

pub use gemini::GeminiProvider;
pub use ollama::OllamaProvider;
pub use openai::OpenAiProvider;

/// A single text-generation request. Streaming is never requested.
#[derive(Debug, Clone, Serialize)]
pub struct PromptJob {
    pub model: String,
    pub prompt: String,
    pub stream: bool,
}

impl PromptJob {
    pub fn new(model: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            prompt: prompt.into(),
            stream: false,
        }
    }
}

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("request to {provider} failed: {source}")]
    Transport {
        provider: ProviderKind,
        #[source]
        source: reqwest::Error,
    },
    #[error("{provider} returned an unexpected body: {detail}; body: {body}")]
    MalformedResponse {
        provider: ProviderKind,
        detail: String,
        body: String,
    },
    #[error("{provider} API error (status {status}): {message}")]
    ProviderApi {
        provider: ProviderKind,
        status: u16,
        message: String,
    },
    #[error("{provider} endpoint did not return JSON, check the endpoint configuration; body: {body}")]
    MisconfiguredEndpoint { provider: ProviderKind, body: String },
    #[error("{provider} returned an empty completion")]
    EmptyCompletion { provider: ProviderKind },
}

#[async_trait]
pub trait TextProvider: Send + Sync {
    fn kind(&self) -> ProviderKind;

    /// Runs one prompt and returns the completion text with code fences
    /// removed. Exactly one upstream attempt is made.
    async fn generate(&self, job: PromptJob) -> Result<String, ProviderError>;
}

pub fn from_config(config: &ProviderConfig, http: reqwest::Client) -> Arc<dyn TextProvider> {
    let credential = config.credential.clone().unwrap_or_default();
    match config.kind {
        ProviderKind::Local => Arc::new(OllamaProvider::new(http, config.endpoint.clone())),
        ProviderKind::HostedChat => Arc::new(OpenAiProvider::new(
            http,
            config.endpoint.clone(),
            credential,
        )),
        ProviderKind::HostedGenerative => Arc::new(GeminiProvider::new(
            http,
            config.endpoint.clone(),
            credential,
        )),
    }
}

/// Removes Markdown code fences that models like to wrap HTML in.
pub fn strip_code_fences(text: &str) -> String {
    text.replace("```html", "")
        .replace("```HTML", "")
        .replace("```", "")
        .trim()
        .to_string()
}

/// Shared tail of every provider: reject blank completions, then strip fences.
fn finish_completion(provider: ProviderKind, text: Option<String>) -> Result<String, ProviderError> {
    let cleaned = text.map(|t| strip_code_fences(&t)).unwrap_or_default();
    if cleaned.is_empty() {
        return Err(ProviderError::EmptyCompletion { provider });
    }
    Ok(cleaned)
}

/// Renders an `error` member that may be a string or an object with `message`.
fn api_error_message(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        other => other
            .get("message")
            .and_then(|m| m.as_str())
            .map(str::to_string)
            .unwrap_or_else(|| other.to_string()),
    }
}

const BODY_SNIPPET_LEN: usize = 512;

fn body_snippet(body: &str) -> String {
    if body.len() <= BODY_SNIPPET_LEN {
        return body.to_string();
    }
    let mut end = BODY_SNIPPET_LEN;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &body[..end])
}
