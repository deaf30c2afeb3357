use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use html_escape::encode_text;
use thiserror::Error;

use crate::pipeline::PipelineError;

const ERROR_TEMPLATE: &str = include_str!("../templates/error.html");

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("page not found: {0}")]
    NotFound(String),
    #[error("invalid request: {0}")]
    BadRequest(String),
    #[error("method {method} not allowed for {path}")]
    MethodNotAllowed { method: String, path: String },
    #[error("could not load static asset {file}: {source}")]
    StaticAsset {
        file: &'static str,
        #[source]
        source: std::io::Error,
    },
    #[error("AI response error")]
    AiResponse,
    #[error("image search error")]
    ImageSearch,
}

impl ServiceError {
    pub fn status(&self) -> StatusCode {
        match self {
            ServiceError::NotFound(_) => StatusCode::NOT_FOUND,
            ServiceError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ServiceError::MethodNotAllowed { .. } => StatusCode::METHOD_NOT_ALLOWED,
            ServiceError::StaticAsset { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            ServiceError::AiResponse | ServiceError::ImageSearch => StatusCode::BAD_GATEWAY,
        }
    }

    fn title(&self) -> &'static str {
        match self {
            ServiceError::NotFound(_) => "Page not found",
            ServiceError::BadRequest(_) => "Bad request",
            ServiceError::MethodNotAllowed { .. } => "Method not allowed",
            ServiceError::StaticAsset { .. } => "Error loading the file",
            ServiceError::AiResponse => "AI response error",
            ServiceError::ImageSearch => "Image search error",
        }
    }

    fn message(&self) -> String {
        match self {
            ServiceError::NotFound(path) => format!("The page '{path}' was not found."),
            ServiceError::BadRequest(reason) => reason.clone(),
            ServiceError::MethodNotAllowed { method, path } => {
                format!("The page '{path}' does not accept {method} requests.")
            }
            ServiceError::StaticAsset { .. } => {
                "The requested file could not be loaded. Please try again later.".to_string()
            }
            ServiceError::AiResponse => {
                "The AI model did not return a usable response. Please try again.".to_string()
            }
            ServiceError::ImageSearch => {
                "No images were found for this topic. Please try a different one.".to_string()
            }
        }
    }
}

impl From<PipelineError> for ServiceError {
    fn from(err: PipelineError) -> Self {
        match err {
            PipelineError::AiResponse { .. } => ServiceError::AiResponse,
            PipelineError::ImageSearch { .. } => ServiceError::ImageSearch,
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let body = render_error_page(self.title(), &self.message());
        (self.status(), Html(body)).into_response()
    }
}

/// Fills the shared error template. Both values are escaped since the
/// message may echo the request path.
pub fn render_error_page(title: &str, message: &str) -> String {
    ERROR_TEMPLATE
        .replace("{{title}}", &encode_text(title))
        .replace("{{message}}", &encode_text(message))
}
