//! insurecost web server
//!
//! Run with: cargo run -p insurecost-web

use std::net::SocketAddr;
use std::sync::Arc;

use insurecost_web::config::Config;
use insurecost_web::state::AppState;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialise structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("insurecost=debug,info")),
        )
        .init();

    info!("Starting insurecost web server...");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    let config = Config::load()?;
    let endpoint = config.predictor.endpoint()?;
    info!("Prediction service: {endpoint}");

    let state = Arc::new(AppState::from_config(&config)?);
    let controller = state.controller.clone();
    let app = insurecost_web::router::build_router(state);

    let addr: SocketAddr = config.server.bind.parse()?;
    info!("Server listening on http://{addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            let _ = tokio::signal::ctrl_c().await;
            info!("Shutdown requested");
            // Drop whatever prediction is still in flight
            controller.shutdown();
        })
        .await?;

    Ok(())
}
