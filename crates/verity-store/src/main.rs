//! Standalone blob store service binary.

use anyhow::{Context, Result};
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;
use verity_store::{BlobStoreService, StoreConfig};

/// Load configuration from environment.
fn load_config() -> StoreConfig {
    let mut config = StoreConfig::default();

    if let Ok(port) = std::env::var("VERITY_STORE_PORT") {
        if let Ok(p) = port.parse() {
            config.port = p;
        } else {
            warn!("VERITY_STORE_PORT must be a port number");
        }
    }

    config
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_target(true)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = load_config();
    let mut service = BlobStoreService::new(config);
    let addr = service
        .start()
        .await
        .context("failed to bind blob store listener")?;

    info!(addr = %addr, "Blob store is running. Press Ctrl+C to stop.");
    tokio::signal::ctrl_c().await?;

    service.shutdown();
    info!("Blob store stopped");
    Ok(())
}
