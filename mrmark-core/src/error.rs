// mrmark-core/src/error.rs

use crate::domain::error::DomainError;
use crate::infrastructure::error::InfrastructureError;
use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Debug, Diagnostic)]
pub enum MrMarkError {
    // --- DOMAIN ERRORS (rules, dataset kinds, malformed collections) ---
    #[error(transparent)]
    #[diagnostic(transparent)]
    Domain(#[from] DomainError),

    // --- INFRASTRUCTURE ERRORS (IO, YAML, DuckDB) ---
    #[error(transparent)]
    #[diagnostic(transparent)]
    Infrastructure(#[from] InfrastructureError),
}

impl From<duckdb::Error> for MrMarkError {
    fn from(err: duckdb::Error) -> Self {
        MrMarkError::Infrastructure(InfrastructureError::from(err))
    }
}
