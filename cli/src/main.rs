//! Complaint Desk CLI server
//!
//! ```sh
//! # Run with default config (~/.config/complaint-desk/config.toml)
//! complaint-desk
//!
//! # Custom config path and port
//! complaint-desk --config /etc/complaint-desk/config.toml --port 8080
//!
//! # Validate config without starting
//! complaint-desk --check
//! ```

use std::path::PathBuf;

use clap::Parser;
use tracing::{error, info};

use complaint_desk::config::AppConfig;
use complaint_desk::server::{init_tracing, ServerHandle, ServerOptions};

/// Complaint Desk: customers file complaints, technicians resolve them, admins triage.
#[derive(Parser, Debug)]
#[command(
    name = "complaint-desk",
    version,
    about = "Role-based complaint tracking service",
    long_about = "Complaint Desk REST API and live-update WebSocket.\n\n\
                  Default config: ~/.config/complaint-desk/config.toml"
)]
struct Cli {
    /// Path to the configuration file (TOML).
    #[arg(short, long, env = "COMPLAINT_DESK_CONFIG")]
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

    /// Insert demo technicians, customers and complaints.
    #[arg(long)]
    seed_demo: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // ── Load configuration ─────────────────────────────────────
    let config_path = cli
        .config
        .unwrap_or_else(complaint_desk::default_config_path);

    let loaded = AppConfig::load(&config_path);
    let mut config = match &loaded {
        Ok(cfg) => cfg.clone(),
        Err(_) => AppConfig::default(),
    };
    config.apply_env_overrides()?;

    // ── Apply CLI overrides ────────────────────────────────────
    if let Some(port) = cli.port {
        config.server.port = port;
    }
    if let Some(ref level) = cli.log_level {
        config.logging.level = level.clone();
    }
    if cli.seed_demo {
        config.seed.demo_data = true;
    }

    init_tracing(&config);
    match loaded {
        Ok(_) => info!("Configuration loaded from {}", config_path.display()),
        Err(e) => {
            error!("Failed to load config from {}: {}", config_path.display(), e);
            error!("Using default configuration.");
        }
    }

    config.validate()?;

    // ── Config validation mode ─────────────────────────────────
    if cli.check {
        println!("Configuration is valid");
        println!("   Config file : {}", config_path.display());
        println!("   Address     : {}", config.address());
        println!("   Database    : {}", config.database.url);
        println!("   Log level   : {}", config.logging.level);
        println!("   Demo data   : {}", config.seed.demo_data);
        return Ok(());
    }

    // ── Start server ───────────────────────────────────────────
    let mut options = ServerOptions::new(config);
    options.auto_migrate = !cli.no_migrate;
    options.create_default_admin = !cli.no_admin;

    let handle = ServerHandle::start(options).await?;
    handle.install_signal_handler();

    info!("Press Ctrl+C to shutdown gracefully.");

    handle.shutdown_signal().wait().await;
    handle.wait().await;

    Ok(())
}
