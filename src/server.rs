use std::sync::Arc;

use axum::{
    Router,
    extract::{Query, State, rejection::QueryRejection},
    http::{Method, Uri, header},
    response::{Html, IntoResponse, Response},
    routing::get,
};
use serde::Deserialize;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use crate::{
    config::AppConfig,
    error::ServiceError,
    pipeline::{GenerationPipeline, GenerationRequest, Language},
};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub pipeline: Arc<GenerationPipeline>,
}

/// A file under the static directory served as-is.
#[derive(Debug)]
pub struct StaticAsset {
    pub path: &'static str,
    pub file: &'static str,
    pub content_type: &'static str,
}

pub const STATIC_ASSETS: &[StaticAsset] = &[
    StaticAsset {
        path: "/",
        file: "index.html",
        content_type: "text/html; charset=utf-8",
    },
    StaticAsset {
        path: "/index.html",
        file: "index.html",
        content_type: "text/html; charset=utf-8",
    },
    StaticAsset {
        path: "/about.html",
        file: "about.html",
        content_type: "text/html; charset=utf-8",
    },
    StaticAsset {
        path: "/ollama.jpeg",
        file: "ollama.jpeg",
        content_type: "image/jpeg",
    },
];

#[derive(Debug, Deserialize)]
pub struct GenerateParams {
    mensagem: Option<String>,
    language: Option<String>,
}

pub fn build_router(config: Arc<AppConfig>, pipeline: Arc<GenerationPipeline>) -> Router {
    let state = AppState { config, pipeline };

    let mut router = Router::new()
        .route("/health", get(health))
        .route("/generate", get(generate));

    for asset in STATIC_ASSETS {
        router = router.route(
            asset.path,
            get(move |State(state): State<AppState>| serve_static(state, asset)),
        );
    }

    router
        .fallback(not_found)
        .method_not_allowed_fallback(method_not_allowed)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

async fn health() -> &'static str {
    "ok"
}

async fn generate(
    State(state): State<AppState>,
    params: Result<Query<GenerateParams>, QueryRejection>,
) -> Result<Html<String>, ServiceError> {
    let Query(params) = params.map_err(|rejection| ServiceError::BadRequest(rejection.body_text()))?;

    let request = GenerationRequest::new(
        params.mensagem.as_deref(),
        Language::from_param(params.language.as_deref()),
    );
    info!(topic = %request.topic(), language = request.language().code(), "generate requested");

    let page = state.pipeline.run(&request).await?;
    Ok(Html(page.html))
}

async fn serve_static(state: AppState, asset: &'static StaticAsset) -> Result<Response, ServiceError> {
    let path = state.config.static_dir.join(asset.file);
    match tokio::fs::read(&path).await {
        Ok(bytes) => Ok(([(header::CONTENT_TYPE, asset.content_type)], bytes).into_response()),
        Err(source) => {
            error!(path = %path.display(), error = %source, "failed to read static asset");
            Err(ServiceError::StaticAsset {
                file: asset.file,
                source,
            })
        }
    }
}

async fn not_found(uri: Uri) -> ServiceError {
    ServiceError::NotFound(uri.path().to_string())
}

async fn method_not_allowed(method: Method, uri: Uri) -> ServiceError {
    ServiceError::MethodNotAllowed {
        method: method.to_string(),
        path: uri.path().to_string(),
    }
}
