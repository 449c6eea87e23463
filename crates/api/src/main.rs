use anyhow::Context;

use trendshelf_infra::config::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    trendshelf_observability::init();

    let config = AppConfig::from_env().context("invalid configuration")?;
    let bind_addr = config.bind_addr;

    let app = trendshelf_api::app::build_app(config);

    let listener = tokio::net::TcpListener::bind(bind_addr)
        .await
        .with_context(|| format!("failed to bind {bind_addr}"))?;

    tracing::info!(addr = %listener.local_addr()?, "listening");

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
