//! STOMP Gateway Server entry point
//!
//! Run with:
//! ```bash
//! cargo run -p stomp-gateway
//! ```
//!
//! Configuration is loaded from environment variables.

use stomp_common::{try_init_tracing_with_config, AppConfig, AppError, TracingConfig};
use tracing::{error, info};

#[tokio::main]
async fn main() {
    // Load configuration before tracing so the environment picks the format
    let config = match AppConfig::from_env().map_err(AppError::from) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = try_init_tracing_with_config(TracingConfig::for_environment(config.app.env)) {
        eprintln!("Warning: Failed to initialize tracing: {e}");
    }

    // Run the server
    if let Err(e) = run(config).await {
        error!(error = %e, "Gateway failed");
        std::process::exit(1);
    }
}

async fn run(config: AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    info!(
        app = %config.app.name,
        env = ?config.app.env,
        address = %config.server.address(),
        admin_topic = %config.broker.admin_topic,
        "Configuration loaded"
    );

    stomp_gateway::run(config).await?;

    Ok(())
}
