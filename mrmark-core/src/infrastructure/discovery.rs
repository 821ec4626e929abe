// mrmark-core/src/infrastructure/discovery.rs

use std::path::{Path, PathBuf};
use tracing::{debug, instrument};
use walkdir::WalkDir;

use crate::infrastructure::error::InfrastructureError;

/// Lists `*.json` files under `dir`, recursively and sorted.
#[instrument]
pub fn discover_data_files(dir: &Path) -> Result<Vec<PathBuf>, InfrastructureError> {
    if !dir.is_dir() {
        return Err(InfrastructureError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("data directory {:?} does not exist", dir),
        )));
    }

    let mut files: Vec<PathBuf> = WalkDir::new(dir)
        .follow_links(true)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .filter(|p| p.extension().is_some_and(|ext| ext == "json"))
        .collect();
    files.sort();

    debug!(count = files.len(), "Data files discovered");
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_discovers_nested_json_sorted() -> Result<()> {
        let dir = tempdir()?;
        fs::create_dir(dir.path().join("instagram"))?;
        fs::write(dir.path().join("b.json"), "[]")?;
        fs::write(dir.path().join("a.json"), "[]")?;
        fs::write(dir.path().join("notes.txt"), "")?;
        fs::write(dir.path().join("instagram").join("c.json"), "[]")?;

        let files = discover_data_files(dir.path())?;
        assert_eq!(
            files,
            vec![
                dir.path().join("a.json"),
                dir.path().join("b.json"),
                dir.path().join("instagram").join("c.json"),
            ]
        );
        Ok(())
    }

    #[test]
    fn test_missing_directory_is_an_error() {
        let missing = Path::new("/definitely/not/here");
        assert!(discover_data_files(missing).is_err());
    }
}
