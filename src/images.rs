use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::config::ImageSearchConfig;

const PER_PAGE: &str = "5";

/// Candidate image URLs in ranking order. The first entry is the one used.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImageResult(Vec<String>);

impl ImageResult {
    pub fn new(urls: Vec<String>) -> Self {
        Self(urls)
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// The selected image, if any. May be blank when the API omitted it.
    pub fn selected(&self) -> Option<&str> {
        self.0.first().map(String::as_str)
    }

    pub fn urls(&self) -> &[String] {
        &self.0
    }
}

#[async_trait]
pub trait ImageSearch: Send + Sync {
    /// Never fails: every problem is logged and reported as an empty result.
    async fn search(&self, keywords: &str) -> ImageResult;
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    results: Vec<Photo>,
}

impl SearchResponse {
    /// One entry per photo; a photo without a `regular` url keeps its slot as "".
    fn into_urls(self) -> Vec<String> {
        self.results
            .into_iter()
            .map(|photo| photo.urls.and_then(|u| u.regular).unwrap_or_default())
            .collect()
    }
}

#[derive(Debug, Deserialize)]
struct Photo {
    urls: Option<PhotoUrls>,
}

#[derive(Debug, Deserialize)]
struct PhotoUrls {
    regular: Option<String>,
}

pub struct UnsplashClient {
    http: reqwest::Client,
    endpoint: String,
    access_key: String,
}

impl UnsplashClient {
    pub fn new(http: reqwest::Client, config: &ImageSearchConfig) -> Self {
        Self {
            http,
            endpoint: config.endpoint.clone(),
            access_key: config.access_key.clone(),
        }
    }
}

#[async_trait]
impl ImageSearch for UnsplashClient {
    async fn search(&self, keywords: &str) -> ImageResult {
        let url = format!("{}/search/photos", self.endpoint);
        let response = self
            .http
            .get(&url)
            .query(&[("query", keywords), ("per_page", PER_PAGE)])
            .header(
                reqwest::header::AUTHORIZATION,
                format!("Client-ID {}", self.access_key),
            )
            .send()
            .await;

        let body = match response {
            Ok(resp) => match resp.text().await {
                Ok(body) => body,
                Err(err) => {
                    warn!(error = %err, "failed to read unsplash response");
                    return ImageResult::empty();
                }
            },
            Err(err) => {
                warn!(error = %err, "error fetching images from unsplash");
                return ImageResult::empty();
            }
        };

        match serde_json::from_str::<SearchResponse>(&body) {
            Ok(parsed) => {
                let urls = parsed.into_urls();
                debug!(count = urls.len(), %keywords, "unsplash search finished");
                ImageResult::new(urls)
            }
            Err(err) => {
                warn!(error = %err, %body, "error parsing unsplash response");
                ImageResult::empty()
            }
        }
    }
}
