use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{
    PromptJob, ProviderError, TextProvider, api_error_message, body_snippet, finish_completion,
};
use crate::config::ProviderKind;

const KIND: ProviderKind = ProviderKind::HostedChat;

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 1],
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
    error: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Option<ResponseMessage>,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

/// OpenAI-compatible `/chat/completions` client.
pub struct OpenAiProvider {
    http: reqwest::Client,
    endpoint: String,
    api_key: String,
}

impl OpenAiProvider {
    pub fn new(http: reqwest::Client, endpoint: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            http,
            endpoint: endpoint.into(),
            api_key: api_key.into(),
        }
    }
}

#[async_trait]
impl TextProvider for OpenAiProvider {
    fn kind(&self) -> ProviderKind {
        KIND
    }

    async fn generate(&self, job: PromptJob) -> Result<String, ProviderError> {
        let url = format!("{}/chat/completions", self.endpoint);
        debug!(%url, model = %job.model, "sending prompt to chat completions");

        let request = ChatRequest {
            model: &job.model,
            messages: [ChatMessage {
                role: "user",
                content: &job.prompt,
            }],
        };

        let transport = |source| ProviderError::Transport {
            provider: KIND,
            source,
        };
        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(transport)?;
        let status = response.status();
        let body = response.text().await.map_err(transport)?;

        let parsed: ChatResponse =
            serde_json::from_str(&body).map_err(|e| ProviderError::MalformedResponse {
                provider: KIND,
                detail: e.to_string(),
                body: body_snippet(&body),
            })?;

        // An error member wins even on a 2xx status.
        if let Some(error) = parsed.error.as_ref() {
            return Err(ProviderError::ProviderApi {
                provider: KIND,
                status: status.as_u16(),
                message: api_error_message(error),
            });
        }

        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message)
            .and_then(|message| message.content);
        if content.is_none() {
            return Err(ProviderError::MalformedResponse {
                provider: KIND,
                detail: "missing choices[0].message.content".to_string(),
                body: body_snippet(&body),
            });
        }

        finish_completion(KIND, content)
    }
}
