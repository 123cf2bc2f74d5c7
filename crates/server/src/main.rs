use anyhow::Context;
use db::DBService;
use server::{AppState, config::ServerConfig, routes};
use tracing::info;
use utils::logging::init_tracing;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = ServerConfig::from_env()?;
    let address = config.bind_address()?;
    let db = DBService::new(&config.database_url)
        .await
        .with_context(|| format!("failed to open database at {}", config.database_url))?;
    info!(merge_policy = %config.merge_policy, "Configuration loaded");

    let app = routes::router(AppState::new(db, config));
    let listener = tokio::net::TcpListener::bind(address).await?;
    info!("Server running on http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to install Ctrl+C handler: {e}");
    }
    info!("Shutdown signal received");
}
