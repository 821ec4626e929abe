// mrmark-core/src/infrastructure/report.rs

use chrono::{DateTime, Utc};
use std::fs;
use std::path::PathBuf;
use tracing::{info, instrument};

use crate::domain::quality::{ValidationResult, WarehouseReport};
use crate::infrastructure::error::InfrastructureError;
use crate::infrastructure::fs::write_unique;

const REPORT_PREFIX: &str = "quality_report";

/// Writes quality reports as timestamp-named JSON artifacts.
///
/// Existing reports are never overwritten: a name collision gets a numeric
/// suffix.
#[derive(Debug, Clone)]
pub struct ReportStore {
    dir: PathBuf,
}

impl ReportStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    #[instrument(skip(self, result), fields(collection = %result.collection_id))]
    pub fn write_validation(&self, result: &ValidationResult) -> Result<PathBuf, InfrastructureError> {
        let stem = format!(
            "{}_{}_{}",
            REPORT_PREFIX,
            sanitize(&result.collection_id),
            stamp(result.timestamp)
        );
        self.write(&stem, &result.to_json()?)
    }

    #[instrument(skip(self, report))]
    pub fn write_warehouse(&self, report: &WarehouseReport) -> Result<PathBuf, InfrastructureError> {
        let stem = format!("{}_{}", REPORT_PREFIX, stamp(report.timestamp));
        self.write(&stem, &report.to_json()?)
    }

    fn write(&self, stem: &str, json: &str) -> Result<PathBuf, InfrastructureError> {
        fs::create_dir_all(&self.dir)?;
        let path = write_unique(&self.dir, stem, "json", json)?;
        info!(path = ?path, "Quality report written");
        Ok(path)
    }
}

fn stamp(ts: DateTime<Utc>) -> String {
    ts.format("%Y%m%d_%H%M%S").to_string()
}

/// Keeps collection ids usable as file name fragments.
fn sanitize(id: &str) -> String {
    id.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}
