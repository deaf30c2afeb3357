mod document;
mod prompts;

use std::{fmt, sync::Arc, time::Instant};

use thiserror::Error;
use tracing::{info, warn};

use crate::{
    images::ImageSearch,
    provider::{PromptJob, ProviderError, TextProvider},
};

pub const DEFAULT_TOPIC: &str = "Ollama: running large language models on your own machine";
pub const PLACEHOLDER_IMAGE_URL: &str = "https://placehold.co/1200x600?text=Landing+Page";

/// Locale the generated page is written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Language {
    PtBr,
    #[default]
    English,
}

impl Language {
    /// Only the exact `pt-br` code selects Portuguese; anything else falls back.
    pub fn from_param(raw: Option<&str>) -> Self {
        match raw {
            Some("pt-br") => Language::PtBr,
            _ => Language::English,
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            Language::PtBr => "pt-br",
            Language::English => "en",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Language::PtBr => "Brazilian Portuguese",
            Language::English => "English",
        }
    }
}

#[derive(Debug, Clone)]
pub struct GenerationRequest {
    topic: String,
    language: Language,
}

impl GenerationRequest {
    /// A missing or blank topic is replaced with [`DEFAULT_TOPIC`].
    pub fn new(topic: Option<&str>, language: Language) -> Self {
        let topic = topic
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .unwrap_or(DEFAULT_TOPIC)
            .to_string();
        Self { topic, language }
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    pub fn language(&self) -> Language {
        self.language
    }
}

/// Final HTML handed back to the client.
#[derive(Debug, Clone)]
pub struct PageArtifact {
    pub html: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Keywords,
    ImageSearch,
    Synthesis,
    Optimization,
}

impl Stage {
    pub fn as_str(self) -> &'static str {
        match self {
            Stage::Keywords => "keywords",
            Stage::ImageSearch => "image_search",
            Stage::Synthesis => "synthesis",
            Stage::Optimization => "optimization",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("AI response error during {stage} stage")]
    AiResponse {
        stage: Stage,
        #[source]
        source: ProviderError,
    },
    #[error("image search returned no results for keywords '{keywords}'")]
    ImageSearch { keywords: String },
}

pub struct GenerationPipeline {
    provider: Arc<dyn TextProvider>,
    images: Arc<dyn ImageSearch>,
    model: String,
    optimize: bool,
}

impl GenerationPipeline {
    pub fn new(
        provider: Arc<dyn TextProvider>,
        images: Arc<dyn ImageSearch>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            provider,
            images,
            model: model.into(),
            optimize: false,
        }
    }

    /// Enables the extra localization/minification pass over the page.
    pub fn with_optimization(mut self, enabled: bool) -> Self {
        self.optimize = enabled;
        self
    }

    pub async fn run(&self, request: &GenerationRequest) -> Result<PageArtifact, PipelineError> {
        let started = Instant::now();
        let topic = request.topic();
        let language = request.language();
        info!(%topic, language = language.code(), provider = %self.provider.kind(), "generating landing page");

        let keywords = self
            .prompt(Stage::Keywords, prompts::keywords(topic, language))
            .await?;

        let stage = Stage::ImageSearch;
        let images = self.images.search(&keywords).await;
        if images.is_empty() {
            warn!(stage = stage.as_str(), %topic, %keywords, "image search returned no results");
            return Err(PipelineError::ImageSearch { keywords });
        }
        info!(stage = stage.as_str(), count = images.len(), "stage complete");

        let image_url = images
            .selected()
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .unwrap_or(PLACEHOLDER_IMAGE_URL);

        let mut page = self
            .prompt(
                Stage::Synthesis,
                prompts::landing_page(topic, language, image_url),
            )
            .await?;

        if self.optimize {
            match self
                .prompt(Stage::Optimization, prompts::optimization(&page, language))
                .await
            {
                Ok(optimized) => page = optimized,
                Err(err) => warn!(error = %err, "optimization failed, serving unoptimized page"),
            }
        }

        let html = document::finish(&page, topic, language.code());
        info!(
            %topic,
            bytes = html.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "landing page ready"
        );
        Ok(PageArtifact { html })
    }

    async fn prompt(&self, stage: Stage, prompt: String) -> Result<String, PipelineError> {
        let started = Instant::now();
        let job = PromptJob::new(self.model.clone(), prompt);
        match self.provider.generate(job).await {
            Ok(text) => {
                info!(
                    stage = stage.as_str(),
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "stage complete"
                );
                Ok(text)
            }
            Err(source) => {
                warn!(stage = stage.as_str(), error = %source, "AI request failed");
                Err(PipelineError::AiResponse { stage, source })
            }
        }
    }
}
