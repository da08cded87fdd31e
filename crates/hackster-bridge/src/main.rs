//! Event bridge entry point
//!
//! Run with:
//! ```bash
//! cargo run -p hackster-bridge
//! ```
//!
//! Configuration is loaded from environment variables (see `.env.example`).

use hackster_common::{try_init_tracing, AppConfig};
use tracing::{error, info};

#[tokio::main]
async fn main() {
    // Initialize tracing
    if let Err(e) = try_init_tracing() {
        eprintln!("Warning: Failed to initialize tracing: {e}");
    }

    // Run the bridge
    if let Err(e) = run().await {
        error!(error = %e, "Bridge failed");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    info!("Starting Hackster event bridge...");

    // Load configuration
    let config = AppConfig::from_env().map_err(|e| {
        error!(error = %e, "Failed to load configuration");
        e
    })?;
    config.validate()?;

    info!(
        env = ?config.app.env,
        workers = config.bridge.workers,
        ops_port = config.ops.port,
        "Configuration loaded"
    );

    // Run the bridge
    hackster_bridge::run(config).await?;

    Ok(())
}
