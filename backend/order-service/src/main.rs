/// Order Service Main Entry Point
///
/// Starts gRPC server with:
/// - AuthService (login) backed by the in-memory credential store
/// - ProductInfo and OrderManagement
/// - RBAC layer checking every call against the access table
use anyhow::{Context, Result};
use order_service::config::{load_dotenv, log_filter};
use order_service::{App, Settings};
use tokio::signal;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // .env may carry RUST_LOG, so it is loaded before the subscriber
    let dotenv = load_dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(log_filter())
        .with_target(false)
        .json()
        .init();

    info!("Starting Order Service");
    if let Some(path) = dotenv {
        info!(path = %path.display(), "Loaded .env file for development");
    }

    // Load configuration
    let settings = Settings::load().context("Failed to load configuration")?;
    info!(
        batch_size = settings.orders.batch_size.get(),
        search_buffer = settings.orders.search_buffer,
        "Configuration loaded successfully"
    );

    let addr = settings.server.addr()?;
    let app = App::build(&settings)
        .await
        .context("Failed to initialize services")?;

    app.serve(addr, shutdown_signal()).await?;

    info!("Order service shutdown complete");

    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C signal");
        },
        _ = terminate => {
            info!("Received SIGTERM signal");
        },
    }

    info!("Shutting down gracefully...");
}
