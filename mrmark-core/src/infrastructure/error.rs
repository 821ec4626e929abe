// mrmark-core/src/infrastructure/error.rs

use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Debug, Diagnostic)]
pub enum DatabaseError {
    #[error("DuckDB Engine Error: {0}")]
    #[diagnostic(
        code(mrmark::infra::database::duckdb),
        help("An error occurred inside the SQL engine.")
    )]
    DuckDB(#[from] duckdb::Error),

    #[error("Table '{0}' does not exist in the warehouse")]
    #[diagnostic(
        code(mrmark::infra::database::table_not_found),
        help("Load the warehouse first or restrict the report with --tables.")
    )]
    TableNotFound(String),

    #[error("DuckDB connection lock poisoned")]
    #[diagnostic(code(mrmark::infra::database::poisoned))]
    Poisoned,
}

#[derive(Error, Debug, Diagnostic)]
pub enum InfrastructureError {
    // --- DATABASE (Abstracted) ---
    #[error(transparent)]
    #[diagnostic(transparent)]
    Database(#[from] DatabaseError),

    // --- FILESYSTEM (IO) ---
    #[error("File System Error: {0}")]
    #[diagnostic(
        code(mrmark::infra::io),
        help("Check file permissions or path validity.")
    )]
    Io(#[from] std::io::Error),

    // --- CONFIG / YAML ---
    #[error("YAML Parsing Error in {path}: {source}")]
    #[diagnostic(
        code(mrmark::infra::yaml),
        help("Check your YAML syntax (indentation, types).")
    )]
    YamlError {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("JSON Error: {0}")]
    #[diagnostic(code(mrmark::infra::json))]
    Json(#[from] serde_json::Error),

    #[error("Configuration Error: {0}")]
    #[diagnostic(
        code(mrmark::infra::config),
        help("Thresholds must lie in [0, 1], weights must be >= 0 and freshness_window_secs >= 1.")
    )]
    ConfigError(String),

    #[error("Project configuration not found at '{0}'")]
    #[diagnostic(code(mrmark::infra::config_missing))]
    ConfigNotFound(String),
}

// Manual implementation for shortcuts (e.g. `?` operator on duckdb calls)
impl From<duckdb::Error> for InfrastructureError {
    fn from(err: duckdb::Error) -> Self {
        InfrastructureError::Database(DatabaseError::DuckDB(err))
    }
}
