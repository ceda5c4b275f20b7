use anyhow::Context as _;
use tracing::info;

use harati_core::config::Config as _;
use harati_core::tracing::init_tracing;

use harati_storefront::config::StorefrontConfig;
use harati_storefront::router::build_router;
use harati_storefront::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = StorefrontConfig::from_env().context("load storefront config")?;
    let http_addr = format!("0.0.0.0:{}", config.storefront_port);
    let state = AppState::new(config)?;

    let router = build_router(state);
    let listener = tokio::net::TcpListener::bind(&http_addr)
        .await
        .with_context(|| format!("bind {http_addr}"))?;

    info!("storefront listening on {http_addr}");
    axum::serve(listener, router).await.context("server error")?;
    Ok(())
}
