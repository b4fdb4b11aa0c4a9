//! Dealership service: CLI server
//!
//! Headless API server for deployment as a systemd service, container or
//! standalone process.
//!
//! ```sh
//! # Run with default config (~/.config/dealership/config.toml)
//! dealership
//!
//! # Custom config path
//! dealership --config /etc/dealership/config.toml
//!
//! # Override the port
//! dealership --api-port 8080
//!
//! # Validate config without starting
//! dealership --check
//! ```

use std::path::PathBuf;

use clap::Parser;
use tracing::{error, info};

use dealership::config::AppConfig;
use dealership::server::{init_tracing, ServerHandle, ServerOptions};

/// Car and boat dealership: public catalogue, customer area and back office.
#[derive(Parser, Debug)]
#[command(
    name = "dealership",
    version,
    about = "REST API for a car and boat dealership",
    long_about = "Serves listings, customer appointments and quotes, and the admin back office.\n\n\
                  Default config: ~/.config/dealership/config.toml"
)]
struct Cli {
    /// Path to the configuration file (TOML).
    #[arg(short, long, env = "DEALERSHIP_CONFIG")]
    config: Option<PathBuf>,

    /// Override the REST API listen port.
    #[arg(long)]
    api_port: Option<u16>,

    /// Override the log level (trace, debug, info, warn, error).
    #[arg(short, long)]
    log_level: Option<String>,

    /// Validate the configuration file and exit without starting the server.
    #[arg(long)]
    check: bool,

    /// Skip database migrations on startup.
    #[arg(long)]
    no_migrate: bool,

    /// Skip creating the default admin user.
    #[arg(long)]
    no_admin: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config_path = cli
        .config
        .unwrap_or_else(dealership::default_config_path);

    let mut config = match AppConfig::load_or_default(&config_path) {
        Ok(cfg) => cfg,
        Err(e) => {
            if cli.check {
                eprintln!("❌ {}", e);
                std::process::exit(1);
            }
            return Err(e.into());
        }
    };

    // ── Apply CLI overrides ──────────────────────────────────
    if let Some(port) = cli.api_port {
        config.server.api_port = port;
    }
    if let Some(ref level) = cli.log_level {
        config.logging.level = level.clone();
    }

    if cli.check {
        println!("✅ Configuration is valid");
        println!("   Config file : {}", config_path.display());
        println!(
            "   API address : {}:{}",
            config.server.api_host, config.server.api_port
        );
        println!("   Database    : {}", config.database.url);
        println!(
            "   Uploads     : {} -> {}",
            config.storage.upload_dir.display(),
            config.storage.public_path
        );
        let mail = if config.mail_api_key().is_some() {
            config.mail.api_url.as_str()
        } else {
            "log only"
        };
        println!("   Mail        : {}", mail);
        println!("   Log level   : {}", config.logging.level);
        return Ok(());
    }

    init_tracing(&config);
    info!("Configuration loaded from {}", config_path.display());
    if let Some(port) = cli.api_port {
        info!("CLI override: api_port = {}", port);
    }

    let handle = match ServerHandle::start(ServerOptions {
        config,
        auto_migrate: !cli.no_migrate,
        create_default_admin: !cli.no_admin,
    })
    .await
    {
        Ok(handle) => handle,
        Err(e) => {
            error!("Failed to start: {}", e);
            return Err(e);
        }
    };

    handle.install_signal_handler();
    info!("🚀 Press Ctrl+C to shutdown gracefully.");

    handle.shutdown_signal().wait().await;
    handle.wait().await;

    Ok(())
}
