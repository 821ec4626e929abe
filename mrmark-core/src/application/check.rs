// mrmark-core/src/application/check.rs

use std::fs;
use std::path::{Path, PathBuf};
use tracing::{instrument, warn};

use crate::domain::dataset::DatasetKind;
use crate::domain::quality::{QualityScorer, ValidationResult};
use crate::infrastructure::report::ReportStore;

/// Result of checking one data file.
#[derive(Debug, Clone)]
pub struct FileCheckOutcome {
    pub path: PathBuf,
    pub result: ValidationResult,
    /// Where the report was written, if it was.
    pub report_path: Option<PathBuf>,
}

/// Scores each JSON file independently. A file that cannot be read or decoded
/// gets a degraded result and the remaining files are still processed.
#[instrument(skip(scorer, paths, store), fields(files = paths.len()))]
pub fn check_files(
    scorer: &QualityScorer,
    kind: DatasetKind,
    paths: &[PathBuf],
    store: Option<&ReportStore>,
) -> Vec<FileCheckOutcome> {
    paths
        .iter()
        .map(|path| {
            let result = check_file(scorer, kind, path);
            let report_path = store.and_then(|store| match store.write_validation(&result) {
                Ok(p) => Some(p),
                Err(e) => {
                    warn!(path = ?path, error = %e, "Failed to write quality report");
                    None
                }
            });
            FileCheckOutcome {
                path: path.clone(),
                result,
                report_path,
            }
        })
        .collect()
}

fn check_file(scorer: &QualityScorer, kind: DatasetKind, path: &Path) -> ValidationResult {
    let collection_id = collection_id(path);

    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            return scorer.degraded(&collection_id, kind, format!("cannot read {:?}: {}", path, e));
        }
    };
    match serde_json::from_str::<serde_json::Value>(&content) {
        Ok(document) => scorer.score_json(&collection_id, kind, &document),
        Err(e) => scorer.degraded(&collection_id, kind, format!("invalid JSON: {}", e)),
    }
}

fn collection_id(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use anyhow::Result;
    use tempfile::tempdir;

    #[test]
    fn test_bad_files_do_not_stop_the_batch() -> Result<()> {
        let dir = tempdir()?;
        let good = dir.path().join("posts_good.json");
        let broken = dir.path().join("posts_broken.json");
        let missing = dir.path().join("posts_missing.json");
        fs::write(
            &good,
            r#"[{"id": "1", "platform": "instagram", "timestamp": "2025-03-01T12:00:00Z"}]"#,
        )?;
        fs::write(&broken, "{ not json")?;

        let scorer = QualityScorer::default();
        let outcomes = check_files(
            &scorer,
            DatasetKind::SnsPosts,
            &[good, broken, missing],
            None,
        );

        assert_eq!(outcomes.len(), 3);
        assert_eq!(outcomes[0].result.collection_id, "posts_good");
        assert!(!outcomes[0].result.is_degraded());
        assert_eq!(outcomes[0].result.total_records, 1);

        assert!(outcomes[1].result.is_degraded());
        assert!(outcomes[1].result.failure.as_deref().unwrap().starts_with("invalid JSON"));
        assert!(outcomes[2].result.is_degraded());
        assert!(outcomes.iter().all(|o| o.report_path.is_none()));
        Ok(())
    }

    #[test]
    fn test_reports_are_written_when_a_store_is_given() -> Result<()> {
        let dir = tempdir()?;
        let data = dir.path().join("batch.json");
        fs::write(&data, r#"{"posts": []}"#)?;
        let store = ReportStore::new(dir.path().join("reports"));

        let outcomes = check_files(&QualityScorer::default(), DatasetKind::SnsPosts, &[data], Some(&store));

        let report = outcomes[0].report_path.as_ref().unwrap();
        assert!(report.exists());
        assert!(
            report
                .file_name()
                .unwrap()
                .to_string_lossy()
                .starts_with("quality_report_batch_")
        );
        Ok(())
    }
}
