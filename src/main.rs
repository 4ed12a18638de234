use anyhow::Result;
use tracing::info;
use tracing_subscriber::EnvFilter;

use transcription_relay::{build_app, AppState, Config};

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.system_config.log_filter));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    if let Ok(path) = std::env::var("CONFIG_PATH") {
        info!("Loaded configuration from: {}", path);
    }

    let app_state = AppState::new(config.clone());
    let app = build_app(app_state);

    let addr = config.system_config.socket_addr()?;
    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
