// mrmark/src/commands/mod.rs

pub mod check;
pub mod report;
pub mod rules;

use std::path::{Path, PathBuf};

use anyhow::Context;
use mrmark_core::domain::project::ProjectConfig;
use mrmark_core::infrastructure::config::load_project_config_or_default;

pub(crate) fn load_config(project_dir: &Path) -> anyhow::Result<ProjectConfig> {
    load_project_config_or_default(project_dir).with_context(|| {
        format!(
            "Failed to load project configuration from {:?}",
            project_dir
        )
    })
}

/// Config paths are relative to the project directory unless absolute.
pub(crate) fn resolve(project_dir: &Path, configured: &str) -> PathBuf {
    let path = Path::new(configured);
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        project_dir.join(path)
    }
}

pub(crate) fn fmt_score(score: f64) -> String {
    format!("{:.3}", score)
}
