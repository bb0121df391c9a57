//! vim-karuta CLI - standalone Lingr webhook server

use clap::Parser;
use karuta::{config::expand_path, Config, Core, Storage};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "karuta")]
#[command(author = "vim-jp")]
#[command(version)]
#[command(about = "vim-karuta - Lingr bot for single-kana karuta cards", long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "karuta.toml")]
    config: PathBuf,

    /// Server address, e.g. ":8080" or "127.0.0.1:8080" (overrides PORT)
    #[arg(long)]
    addr: Option<String>,

    /// Override the SQLite database path
    #[arg(long)]
    db: Option<PathBuf>,

    /// Keep entries in memory only
    #[arg(long)]
    ephemeral: bool,

    /// Also write logs to daily rotated files in this directory
    #[arg(long, env = "KARUTA_LOG_DIR")]
    log_dir: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Initialize a new config file with defaults
    #[arg(long)]
    init: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Initialize logging
    let log_level = if args.verbose { "debug" } else { "info" };
    let file_writer = args.log_dir.as_ref().map(|dir| {
        let appender = tracing_appender::rolling::daily(expand_path(dir), "karuta.log");
        tracing_appender::non_blocking(appender)
    });
    let (file_layer, _log_guard) = match file_writer {
        Some((writer, guard)) => (
            Some(
                tracing_subscriber::fmt::layer()
                    .with_ansi(false)
                    .with_writer(writer),
            ),
            Some(guard),
        ),
        None => (None, None),
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("karuta={},tower_http={}", log_level, log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .with(file_layer)
        .init();

    // Handle --init flag
    if args.init {
        let config_path = expand_path(&args.config);
        if config_path.exists() {
            tracing::warn!("Config file already exists: {}", config_path.display());
            return Ok(());
        }
        Config::create_default(&config_path)?;
        tracing::info!("Created default config at: {}", config_path.display());
        return Ok(());
    }

    // Load configuration
    let config_path = expand_path(&args.config);
    let mut config = if config_path.exists() {
        Config::from_file(&config_path)?
    } else {
        tracing::warn!(
            "Config file not found at {}, using defaults",
            config_path.display()
        );
        Config::default()
    };

    // Environment, then CLI overrides
    config.apply_env_overrides();
    if let Some(addr) = args.addr.as_deref() {
        config.server.apply_addr(addr)?;
    }
    if let Some(db) = args.db {
        config.database.path = db;
    }
    if args.ephemeral {
        config.storage = Storage::Ephemeral;
    }

    // Storage open failure is fatal
    let core = Core::new(config)?;

    core.start_api_server().await?;

    Ok(())
}
