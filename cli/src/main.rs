//! Admin Workbench CLI server
//!
//! ```sh
//! # Default config (~/.config/admin-workbench/config.toml)
//! admin-workbench
//!
//! # Custom config path and port
//! admin-workbench --config /etc/admin-workbench/config.toml --port 9090
//!
//! # Validate the config without starting
//! admin-workbench --check
//! ```

use std::path::PathBuf;

use clap::Parser;
use tracing::{error, info};

use admin_workbench::config::{AppConfig, CONFIG_ENV};
use admin_workbench::server::{init_tracing, ServerHandle, ServerOptions};

/// Admin back office: user directory, workbench and document e-signature.
#[derive(Parser, Debug)]
#[command(
    name = "admin-workbench",
    version,
    about = "Multi-tenant admin workbench server",
    long_about = "REST API for the admin users workbench and document e-signature sessions.\n\n\
                  Default config: ~/.config/admin-workbench/config.toml"
)]
struct Cli {
    /// Path to the configuration file (TOML).
    #[arg(short, long, env = CONFIG_ENV)]
    config: Option<PathBuf>,

    /// Override the listen port.
    #[arg(short, long)]
    port: Option<u16>,

    /// Override the log level (trace, debug, info, warn, error).
    #[arg(short, long)]
    log_level: Option<String>,

    /// Validate the configuration and exit without starting the server.
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
        .unwrap_or_else(admin_workbench::default_config_path);

    let loaded = AppConfig::load(&config_path);
    let mut config = match &loaded {
        Ok(cfg) => cfg.clone(),
        Err(_) => AppConfig::default(),
    };

    if let Some(port) = cli.port {
        config.server.port = port;
    }
    if let Some(ref level) = cli.log_level {
        config.logging.level = level.clone();
    }

    init_tracing(&config);
    match loaded {
        Ok(_) => info!("Configuration loaded from {}", config_path.display()),
        Err(e) => {
            error!("{}", e);
            error!("Using default configuration.");
        }
    }
    if cli.port.is_some() || cli.log_level.is_some() {
        info!(port = config.server.port, log_level = %config.logging.level, "CLI overrides applied");
    }

    if cli.check {
        config.validate()?;
        println!("Configuration is valid");
        println!("   Config file : {}", config_path.display());
        println!("   Address     : {}", config.server.address());
        println!("   Database    : {}", config.database.connection_url());
        println!("   Log level   : {}", config.logging.level);
        println!("   Signing API : {}", config.esign.base_url);
        println!("   CMS enabled : {}", config.cms.enabled);
        return Ok(());
    }

    config.validate()?;

    let handle = ServerHandle::start(ServerOptions {
        config,
        auto_migrate: !cli.no_migrate,
        create_default_admin: !cli.no_admin,
    })
    .await?;

    handle.install_signal_handler();
    info!("Press Ctrl+C to shut down gracefully.");

    handle.shutdown_signal().wait().await;
    handle.wait().await;

    Ok(())
}
