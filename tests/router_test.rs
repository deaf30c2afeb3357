mod common;

use std::sync::Arc;

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Method, Request, StatusCode, header},
};
use landing_page_service::{build_router, pipeline::DEFAULT_TOPIC};
use tower::ServiceExt;

use common::{FixedImages, SAMPLE_PAGE, ScriptedProvider, build_pipeline, test_config};

fn app(provider: Arc<ScriptedProvider>, images: Arc<FixedImages>) -> Router {
    app_with_config(provider, images, &[])
}

fn app_with_config(
    provider: Arc<ScriptedProvider>,
    images: Arc<FixedImages>,
    pairs: &[(&str, &str)],
) -> Router {
    build_router(
        Arc::new(test_config(pairs)),
        Arc::new(build_pipeline(provider, images)),
    )
}

async fn get(app: Router, uri: &str) -> (StatusCode, String, String) {
    send(app, Method::GET, uri).await
}

async fn send(app: Router, method: Method, uri: &str) -> (StatusCode, String, String) {
    let (status, content_type, body) = send_raw(app, method, uri).await;
    (status, content_type, String::from_utf8_lossy(&body).into_owned())
}

async fn send_raw(app: Router, method: Method, uri: &str) -> (StatusCode, String, Vec<u8>) {
    let response = app
        .oneshot(
            Request::builder()
                .method(method)
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let status = response.status();
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, content_type, body.to_vec())
}

#[tokio::test]
async fn unknown_path_returns_not_found_page_with_path() {
    let router = app(ScriptedProvider::new(vec![]), FixedImages::new(&[]));
    let (status, content_type, body) = get(router, "/nope").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(content_type.starts_with("text/html"));
    assert!(body.contains("/nope"));
    assert!(body.contains("Page not found"));
}

#[tokio::test]
async fn generate_returns_page() {
    let provider = ScriptedProvider::new(vec![Some("k"), Some(SAMPLE_PAGE)]);
    let router = app(provider.clone(), FixedImages::new(&["https://images.test/a.jpg"]));

    let (status, content_type, body) =
        get(router, "/generate?mensagem=padaria%20artesanal&language=pt-br").await;
    assert_eq!(status, StatusCode::OK);
    assert!(content_type.starts_with("text/html"));
    assert!(body.starts_with("<!DOCTYPE html>"));

    let prompts = provider.prompts();
    assert!(prompts[0].contains("padaria artesanal"));
    assert!(prompts[1].contains("pt-br"));
}

#[tokio::test]
async fn generate_without_topic_uses_default() {
    let provider = ScriptedProvider::new(vec![Some("k"), Some(SAMPLE_PAGE)]);
    let router = app(provider.clone(), FixedImages::new(&["https://images.test/a.jpg"]));

    let (status, _, _) = get(router, "/generate").await;
    assert_eq!(status, StatusCode::OK);
    let prompts = provider.prompts();
    assert!(prompts[0].contains(DEFAULT_TOPIC));
    assert!(prompts[1].contains("locale code en"));
}

#[tokio::test]
async fn pipeline_failures_render_distinct_error_pages() {
    let failing_ai = app(ScriptedProvider::new(vec![None]), FixedImages::new(&["https://images.test/a.jpg"]));
    let (status, content_type, body) = get(failing_ai, "/generate?mensagem=bikes").await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert!(content_type.starts_with("text/html"));
    assert!(body.contains("AI response error"));

    let no_images = app(ScriptedProvider::new(vec![Some("k")]), FixedImages::new(&[]));
    let (status, _, body) = get(no_images, "/generate?mensagem=bikes").await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert!(body.contains("Image search error"));
    assert!(!body.contains("AI response error"));
}

#[tokio::test]
async fn serves_static_assets() {
    let (status, content_type, body) = get(
        app(ScriptedProvider::new(vec![]), FixedImages::new(&[])),
        "/",
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(content_type.starts_with("text/html"));
    assert!(body.contains("/generate"));

    let (status, _, _) = get(
        app(ScriptedProvider::new(vec![]), FixedImages::new(&[])),
        "/about.html",
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, content_type, bytes) = send_raw(
        app(ScriptedProvider::new(vec![]), FixedImages::new(&[])),
        Method::GET,
        "/ollama.jpeg",
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(content_type, "image/jpeg");
    // SOI ... EOI
    assert!(bytes.starts_with(&[0xFF, 0xD8]), "{} bytes", bytes.len());
    assert!(bytes.ends_with(&[0xFF, 0xD9]));
}

#[tokio::test]
async fn wrong_method_returns_error_page() {
    let router = app(ScriptedProvider::new(vec![]), FixedImages::new(&[]));
    let (status, content_type, body) = send(router, Method::POST, "/generate").await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    assert!(content_type.starts_with("text/html"));
    assert!(body.contains("Method not allowed"));
    assert!(body.contains("/generate"));

    let router = app(ScriptedProvider::new(vec![]), FixedImages::new(&[]));
    let (status, _, body) = send(router, Method::DELETE, "/about.html").await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    assert!(body.contains("DELETE"));
}

#[tokio::test]
async fn missing_static_file_is_server_error_page() {
    let router = app_with_config(
        ScriptedProvider::new(vec![]),
        FixedImages::new(&[]),
        &[("STATIC_DIR", "/nonexistent/static/dir")],
    );
    let (status, content_type, body) = get(router, "/index.html").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(content_type.starts_with("text/html"));
    assert!(body.contains("Error loading the file"));
}

#[tokio::test]
async fn health_check() {
    let (status, _, body) = get(
        app(ScriptedProvider::new(vec![]), FixedImages::new(&[])),
        "/health",
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "ok");
}
