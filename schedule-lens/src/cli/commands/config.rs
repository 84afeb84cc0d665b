//! Config command - print or write the effective configuration

use crate::cli::app::ConfigArgs;
use anyhow::{Context, Result};
use schedule_lens_core::Config;

pub fn execute(args: ConfigArgs, config: &Config) -> Result<()> {
    match args.output {
        Some(path) => {
            config
                .save(&path)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            println!("Configuration written to {}", path.display());
        }
        None => print!("{}", config.to_toml()?),
    }
    Ok(())
}
