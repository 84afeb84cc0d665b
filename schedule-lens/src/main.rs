use anyhow::{Context, Result};
use clap::Parser;
use schedule_lens_core::Config;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

mod cli;
mod server;
use cli::{Cli, Commands};

/// Read when no `--config` is given and the file exists
const DEFAULT_CONFIG_FILE: &str = "schedule-lens.toml";

fn load_config(path: Option<&Path>) -> Result<Config> {
    let path = match path {
        Some(path) => path.to_path_buf(),
        None => {
            let fallback = PathBuf::from(DEFAULT_CONFIG_FILE);
            if !fallback.is_file() {
                debug!("No configuration file, using defaults");
                return Ok(Config::default());
            }
            fallback
        }
    };

    info!("Loading configuration from {}", path.display());
    Config::from_file(&path).with_context(|| format!("Invalid configuration in {}", path.display()))
}

fn main() -> Result<()> {
    // Parse CLI arguments first to get verbosity level
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .init();

    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Serve(args) => {
            info!("Serve command: {:?}", args);
            let runtime = tokio::runtime::Runtime::new()?;
            runtime.block_on(cli::commands::serve::execute(args, config))?;
        }
        Commands::Analyze(args) => {
            info!("Analyze command: {:?}", args);
            let runtime = tokio::runtime::Runtime::new()?;
            runtime.block_on(cli::commands::analyze::execute(args, config))?;
        }
        Commands::Config(args) => {
            debug!("Config command: {:?}", args);
            cli::commands::config::execute(args, &config)?;
        }
    }

    Ok(())
}
