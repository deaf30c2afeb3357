use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{
    PromptJob, ProviderError, TextProvider, api_error_message, body_snippet, finish_completion,
};
use crate::config::ProviderKind;

const KIND: ProviderKind = ProviderKind::HostedGenerative;

#[derive(Debug, Serialize)]
struct GenerateContentRequest<'a> {
    contents: [Content<'a>; 1],
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: [RequestPart<'a>; 1],
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    error: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

/// Gemini `generateContent` client. The key travels as a query parameter.
pub struct GeminiProvider {
    http: reqwest::Client,
    endpoint: String,
    api_key: String,
}

impl GeminiProvider {
    pub fn new(http: reqwest::Client, endpoint: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            http,
            endpoint: endpoint.into(),
            api_key: api_key.into(),
        }
    }
}

#[async_trait]
impl TextProvider for GeminiProvider {
    fn kind(&self) -> ProviderKind {
        KIND
    }

    async fn generate(&self, job: PromptJob) -> Result<String, ProviderError> {
        let url = format!("{}/models/{}:generateContent", self.endpoint, job.model);
        debug!(%url, "sending prompt to gemini");

        let request = GenerateContentRequest {
            contents: [Content {
                parts: [RequestPart { text: &job.prompt }],
            }],
        };

        let transport = |source| ProviderError::Transport {
            provider: KIND,
            source,
        };
        let response = self
            .http
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(&request)
            .send()
            .await
            .map_err(transport)?;
        let status = response.status();
        let body = response.text().await.map_err(transport)?;

        // A proxy or wrong base URL answers with an HTML page, not an API error.
        let parsed: GenerateContentResponse = serde_json::from_str(&body).map_err(|_| {
            ProviderError::MisconfiguredEndpoint {
                provider: KIND,
                body: body_snippet(&body),
            }
        })?;

        if let Some(error) = parsed.error.as_ref() {
            return Err(ProviderError::ProviderApi {
                provider: KIND,
                status: status.as_u16(),
                message: api_error_message(error),
            });
        }

        let Some(candidate) = parsed.candidates.into_iter().next() else {
            return Err(ProviderError::MalformedResponse {
                provider: KIND,
                detail: "no candidates returned".to_string(),
                body: body_snippet(&body),
            });
        };
        let text = candidate
            .content
            .and_then(|content| content.parts.into_iter().next())
            .and_then(|part| part.text);

        finish_completion(KIND, text)
    }
}
