use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use super::{
    PromptJob, ProviderError, TextProvider, api_error_message, body_snippet, finish_completion,
};
use crate::config::ProviderKind;

const KIND: ProviderKind = ProviderKind::Local;

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    response: Option<String>,
    error: Option<serde_json::Value>,
}

pub struct OllamaProvider {
    http: reqwest::Client,
    endpoint: String,
}

impl OllamaProvider {
    pub fn new(http: reqwest::Client, endpoint: impl Into<String>) -> Self {
        Self {
            http,
            endpoint: endpoint.into(),
        }
    }
}

#[async_trait]
impl TextProvider for OllamaProvider {
    fn kind(&self) -> ProviderKind {
        KIND
    }

    async fn generate(&self, job: PromptJob) -> Result<String, ProviderError> {
        let url = format!("{}/api/generate", self.endpoint);
        debug!(%url, model = %job.model, "sending prompt to ollama");

        let transport = |source| ProviderError::Transport {
            provider: KIND,
            source,
        };
        let response = self
            .http
            .post(&url)
            .json(&job)
            .send()
            .await
            .map_err(transport)?;
        let status = response.status();
        let body = response.text().await.map_err(transport)?;

        let parsed: GenerateResponse =
            serde_json::from_str(&body).map_err(|e| ProviderError::MalformedResponse {
                provider: KIND,
                detail: e.to_string(),
                body: body_snippet(&body),
            })?;

        if let Some(error) = parsed.error.as_ref() {
            return Err(ProviderError::ProviderApi {
                provider: KIND,
                status: status.as_u16(),
                message: api_error_message(error),
            });
        }
        if parsed.response.is_none() {
            return Err(ProviderError::MalformedResponse {
                provider: KIND,
                detail: "missing 'response' field".to_string(),
                body: body_snippet(&body),
            });
        }

        finish_completion(KIND, parsed.response)
    }
}
