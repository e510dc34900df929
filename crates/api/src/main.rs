use std::sync::Arc;

use anyhow::Context;

use tasktrack_api::app::{build_app, services};
use tasktrack_infra::{AppConfig, GithubClient};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::from_env().context("invalid configuration")?;
    tasktrack_observability::init(&config.log_level);
    tracing::debug!(?config, "configuration loaded");

    let backend = services::connect_backend(&config).await.context("failed to connect KV backend")?;
    let identity = GithubClient::new(
        config.github_oauth_url.clone(),
        config.github_api_url.clone(),
        config.github_client_id.clone(),
        config.github_client_secret.clone(),
        config.github_timeout,
    )
    .context("failed to build identity provider client")?;

    let app = build_app(&config, backend, Arc::new(identity));

    let addr = format!("0.0.0.0:{}", config.listen_port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    tracing::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown requested");
}
