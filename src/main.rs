use std::sync::Arc;

use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use landing_page_service::{
    AppConfig, GenerationPipeline, UnsplashClient, build_router, provider,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = Arc::new(AppConfig::from_env()?);
    tracing::info!(
        ?config.listen_addr,
        provider = %config.provider.kind,
        model = %config.provider.model,
        optimize = config.optimize_output,
        "starting landing page service"
    );
    if config.image_search.access_key.is_empty() {
        tracing::warn!("UNSPLASH_ACCESS_KEY is not set, image search will fail");
    }

    let http = config.http_client()?;
    let text_provider = provider::from_config(&config.provider, http.clone());
    let images = Arc::new(UnsplashClient::new(http, &config.image_search));
    let pipeline = Arc::new(
        GenerationPipeline::new(text_provider, images, config.provider.model.clone())
            .with_optimization(config.optimize_output),
    );
    let router = build_router(config.clone(), pipeline);

    let listener = TcpListener::bind(config.listen_addr).await?;
    let addr = listener.local_addr()?;
    tracing::info!(%addr, "HTTP server ready");

    axum::serve(listener, router).await?;

    Ok(())
}

fn init_tracing() {
    if tracing::dispatcher::has_been_set() {
        return;
    }
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,hyper=warn,axum::rejection=trace".into());
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .compact();

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();
}
