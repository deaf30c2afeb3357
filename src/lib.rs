pub mod config;
pub mod error;
pub mod images;
pub mod pipeline;
pub mod provider;
pub mod server;

pub use config::{AppConfig, ProviderKind};
pub use images::{ImageResult, ImageSearch, UnsplashClient};
pub use pipeline::{GenerationPipeline, GenerationRequest, Language, PageArtifact, PipelineError};
pub use provider::{PromptJob, ProviderError, TextProvider};
pub use server::build_router;
