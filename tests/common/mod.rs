// Shared helpers for integration tests; not every test file uses all of them.
#![allow(dead_code)]

use std::{
    collections::{HashMap, VecDeque},
    sync::{
        Arc, Mutex,
        atomic::{AtomicUsize, Ordering},
    },
};

use async_trait::async_trait;
use axum::Router;
use landing_page_service::{
    AppConfig, GenerationPipeline, ImageResult, ImageSearch, PromptJob, ProviderError,
    ProviderKind, TextProvider,
};

/// Serves `app` on an ephemeral local port and returns its base URL.
pub async fn spawn_mock(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind mock server");
    let addr = listener.local_addr().expect("mock server address");
    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            eprintln!("mock server error: {e}");
        }
    });
    format!("http://{addr}")
}

/// Base URL on which nothing is listening.
pub fn closed_endpoint() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind ephemeral port");
    let port = listener.local_addr().expect("ephemeral address").port();
    drop(listener);
    format!("http://127.0.0.1:{port}")
}

pub fn test_config(pairs: &[(&str, &str)]) -> AppConfig {
    let mut vars: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    vars.entry("STATIC_DIR".to_string())
        .or_insert_with(|| concat!(env!("CARGO_MANIFEST_DIR"), "/public").to_string());
    AppConfig::from_lookup(|key| vars.get(key).cloned()).expect("valid test config")
}

/// Replays canned completions in order and records every prompt it sees.
pub struct ScriptedProvider {
    replies: Mutex<VecDeque<Option<String>>>,
    pub prompts: Mutex<Vec<String>>,
}

impl ScriptedProvider {
    /// `None` entries fail the corresponding call.
    pub fn new(replies: Vec<Option<&str>>) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies.into_iter().map(|r| r.map(str::to_string)).collect()),
            prompts: Mutex::new(Vec::new()),
        })
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl TextProvider for ScriptedProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Local
    }

    async fn generate(&self, job: PromptJob) -> Result<String, ProviderError> {
        self.prompts.lock().unwrap().push(job.prompt);
        match self.replies.lock().unwrap().pop_front().flatten() {
            Some(reply) => Ok(reply),
            None => Err(ProviderError::ProviderApi {
                provider: ProviderKind::Local,
                status: 500,
                message: "scripted failure".to_string(),
            }),
        }
    }
}

/// Returns a fixed result and counts how often it was asked.
pub struct FixedImages {
    result: ImageResult,
    pub calls: AtomicUsize,
    pub queries: Mutex<Vec<String>>,
}

impl FixedImages {
    pub fn new(urls: &[&str]) -> Arc<Self> {
        Arc::new(Self {
            result: ImageResult::new(urls.iter().map(|u| u.to_string()).collect()),
            calls: AtomicUsize::new(0),
            queries: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ImageSearch for FixedImages {
    async fn search(&self, keywords: &str) -> ImageResult {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.queries.lock().unwrap().push(keywords.to_string());
        self.result.clone()
    }
}

pub const SAMPLE_PAGE: &str = "<!DOCTYPE html><html><head><title>t</title></head><body><h1>Hi</h1></body></html>";

pub fn build_pipeline(provider: Arc<ScriptedProvider>, images: Arc<FixedImages>) -> GenerationPipeline {
    GenerationPipeline::new(provider, images, "test-model")
}
