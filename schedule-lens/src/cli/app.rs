use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "schedule-lens",
    version,
    about = "Schedule Lens - TUP/TUF milestone report for project schedules",
    long_about = "Schedule Lens reads a project-schedule file (MSPDI XML), shows the project name and total cost, and lists the TUP/TUF contract milestones it contains."
)]
pub struct Cli {
    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Serve the upload form
    #[command(about = "Serve the single-page upload form over HTTP")]
    Serve(ServeArgs),

    /// Analyze a file from disk
    #[command(about = "Analyze a project-schedule file and print the report")]
    Analyze(AnalyzeArgs),

    /// Show or write the configuration
    #[command(about = "Print the effective configuration or write it to a file")]
    Config(ConfigArgs),
}

#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Address to listen on, overrides the configuration file
    #[arg(short, long, env = "SCHEDULE_LENS_BIND", help = "Address to listen on (host:port)")]
    pub bind: Option<String>,
}

#[derive(Parser, Debug)]
pub struct AnalyzeArgs {
    /// Path to the schedule file
    #[arg(help = "Path to the project-schedule file to analyze")]
    pub path: PathBuf,

    /// Print the analysis as JSON
    #[arg(long, help = "Print the analysis as JSON instead of a table")]
    pub json: bool,
}

#[derive(Parser, Debug)]
pub struct ConfigArgs {
    /// Write the effective configuration here instead of printing it
    #[arg(short, long, help = "Write the configuration to this path")]
    pub output: Option<PathBuf>,
}
