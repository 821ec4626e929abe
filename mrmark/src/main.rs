// mrmark/src/main.rs

mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr so `--format json` keeps stdout machine-readable.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Check {
            files,
            data_dir,
            kind,
            project_dir,
            no_report,
            format,
            fail_under,
        } => commands::check::execute(
            files,
            data_dir,
            kind,
            project_dir,
            no_report,
            format,
            fail_under,
        )?,
        Commands::Report {
            project_dir,
            db_path,
            tables,
            format,
            no_report,
        } => commands::report::execute(project_dir, db_path, tables, format, no_report).await?,
        Commands::Rules { project_dir, kind } => commands::rules::execute(project_dir, kind)?,
    }

    Ok(())
}
