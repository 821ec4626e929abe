// mrmark/src/cli.rs
//
// Single source of truth for all CLI definitions (Clap structs).

use clap::{Parser, Subcommand, ValueEnum};
use mrmark_core::DatasetKind;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "mrmark")]
#[command(about = "Data quality scoring for collected social media data", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 🧪 Scores collected JSON files and writes one report per file
    Check {
        /// Files to score. Defaults to every *.json under the data directory
        files: Vec<PathBuf>,

        /// Directory scanned when no files are given (default: `data-path` from config)
        #[arg(long)]
        data_dir: Option<PathBuf>,

        /// Dataset kind whose rules apply to the files
        #[arg(long, default_value = "sns_posts")]
        kind: DatasetKind,

        /// Project directory
        #[arg(long, default_value = ".")]
        project_dir: PathBuf,

        /// Do not write report files
        #[arg(long)]
        no_report: bool,

        #[arg(long, value_enum, default_value = "table")]
        format: OutputFormat,

        /// Exit with status 1 if any overall score is below this value
        #[arg(long)]
        fail_under: Option<f64>,
    },

    /// 🏭 Scores the warehouse tables and writes a combined report
    Report {
        /// Project directory
        #[arg(long, default_value = ".")]
        project_dir: PathBuf,

        /// DuckDB warehouse file (default: `warehouse-path` from config)
        #[arg(long)]
        db_path: Option<PathBuf>,

        /// Tables to score, comma separated (default: all warehouse tables)
        #[arg(long, value_delimiter = ',')]
        tables: Vec<DatasetKind>,

        #[arg(long, value_enum, default_value = "table")]
        format: OutputFormat,

        /// Do not write the report file
        #[arg(long)]
        no_report: bool,
    },

    /// 📏 Prints the effective thresholds and dataset checks
    Rules {
        /// Project directory
        #[arg(long, default_value = ".")]
        project_dir: PathBuf,

        /// Only show the checks of this dataset kind
        #[arg(long)]
        kind: Option<DatasetKind>,
    },
}
