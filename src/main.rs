//! Dealership service
//!
//! Reads configuration from TOML (`DEALERSHIP_CONFIG`, or
//! `~/.config/dealership/config.toml`) and serves the REST API until
//! SIGINT / SIGTERM.

use tracing::{error, info};

use dealership::server::{init_tracing, ServerHandle, ServerOptions};
use dealership::{config_path_from_env, AppConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config_path = config_path_from_env();

    let config = match AppConfig::load_or_default(&config_path) {
        Ok(cfg) => {
            init_tracing(&cfg);
            info!("Configuration loaded from {}", config_path.display());
            cfg
        }
        Err(e) => {
            init_tracing(&AppConfig::default());
            error!("{}", e);
            return Err(e.into());
        }
    };

    let handle = ServerHandle::start(ServerOptions {
        config,
        ..Default::default()
    })
    .await?;

    handle.install_signal_handler();
    info!("🚀 Press Ctrl+C to shutdown gracefully.");

    handle.shutdown_signal().wait().await;
    handle.wait().await;

    Ok(())
}
