use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(author, version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    Run(RunArgs),
    Inspect(InspectArgs),
}

#[derive(Debug, Args)]
pub struct RunArgs {
    /// Cohort config file (YAML: cohort name -> { book url: title }).
    #[arg(long)]
    pub config: String,

    /// Output directory for plots and the run report.
    #[arg(long)]
    pub out: String,

    /// Maximum concurrent book fetches.
    #[arg(long, default_value_t = 4)]
    pub concurrency: usize,

    /// Retries per page fetch (exponential backoff).
    #[arg(long, default_value_t = 0)]
    pub retries: u32,
}

#[derive(Debug, Args)]
pub struct InspectArgs {
    /// Book URL (must be http/https).
    #[arg(long)]
    pub url: String,
}
