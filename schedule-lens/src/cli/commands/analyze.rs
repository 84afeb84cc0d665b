//! Analyze command - run the pipeline on a file from disk

use crate::cli::app::AnalyzeArgs;
use anyhow::{Context, Result, bail};
use schedule_lens_core::present::text;
use schedule_lens_core::{Analysis, Config, RawUpload};
use tokio::fs;

/// Analyze one schedule file and print the report
pub async fn execute(args: AnalyzeArgs, config: Config) -> Result<()> {
    let bytes = fs::read(&args.path)
        .await
        .with_context(|| format!("Failed to read {}", args.path.display()))?;
    let filename = args
        .path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| args.path.display().to_string());

    let pipeline = config.pipeline();
    let upload = pipeline.policy().accept(Some(RawUpload::new(filename, bytes)))?;
    let analysis = tokio::task::spawn_blocking(move || pipeline.run(&upload))
        .await
        .context("Analysis task panicked")?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&analysis)?);
    }

    match analysis {
        Analysis::Success(_) if args.json => Ok(()),
        Analysis::Success(_) => {
            print!("{}", text::render_analysis(&analysis));
            Ok(())
        }
        Analysis::Failed(notice) => bail!(notice.message),
    }
}
