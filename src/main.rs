use std::process::ExitCode;

use anyhow::Context as _;
use clap::Parser as _;

#[tokio::main]
async fn main() -> ExitCode {
    if let Err(err) = try_main().await {
        eprintln!("{err:#}");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

async fn try_main() -> anyhow::Result<()> {
    warnscope::logging::init().context("init logging")?;

    let cli = warnscope::cli::Cli::parse();
    tracing::debug!(?cli, "parsed cli");

    match cli.command {
        warnscope::cli::Command::Run(args) => {
            warnscope::run::run(args).await.context("run")?;
        }
        warnscope::cli::Command::Inspect(args) => {
            warnscope::inspect::run(args).await.context("inspect")?;
        }
    }

    Ok(())
}
