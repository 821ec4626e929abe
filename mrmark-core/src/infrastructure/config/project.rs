// mrmark-core/src/infrastructure/config/project.rs

use serde::{Deserialize, de::DeserializeOwned};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, instrument};
use validator::Validate;

use crate::domain::dataset::DatasetKind;
use crate::domain::project::configuration::ProjectConfig;
use crate::domain::quality::{DatasetRules, QualityRule};
use crate::infrastructure::error::InfrastructureError;

pub const CONFIG_CANDIDATES: [&str; 2] = ["mrmark_project_conf.yaml", "mrmark.yaml"];

pub const ENV_REPORTS_PATH: &str = "MRMARK_REPORTS_PATH";
pub const ENV_WAREHOUSE_PATH: &str = "MRMARK_WAREHOUSE_PATH";
pub const ENV_FRESHNESS_WINDOW: &str = "MRMARK_FRESHNESS_WINDOW_SECS";

// --- LOADER ---

#[instrument(skip(project_dir))]
pub fn load_project_config(project_dir: &Path) -> Result<ProjectConfig, InfrastructureError> {
    let config_path = find_main_config(project_dir)?;
    info!(path = ?config_path, "Loading project configuration");

    let mut config: ProjectConfig = load_fragment(&config_path)?;

    // Satellites live in the first config path.
    if let Some(config_folder) = config.config_paths.first() {
        let config_dir = project_dir.join(config_folder);
        if config_dir.exists() {
            load_satellite_configs(&mut config, &config_dir)?;
        }
    }

    apply_env_overrides(&mut config, |key| std::env::var(key).ok())?;
    validate(&config)?;

    Ok(config)
}

/// Like [`load_project_config`], but a directory without a project file yields
/// the defaults (still subject to environment overrides).
#[instrument(skip(project_dir))]
pub fn load_project_config_or_default(
    project_dir: &Path,
) -> Result<ProjectConfig, InfrastructureError> {
    match load_project_config(project_dir) {
        Err(InfrastructureError::ConfigNotFound(msg)) => {
            info!(reason = %msg, "No project file, using defaults");
            let mut config = ProjectConfig::default();
            apply_env_overrides(&mut config, |key| std::env::var(key).ok())?;
            validate(&config)?;
            Ok(config)
        }
        other => other,
    }
}

fn find_main_config(root: &Path) -> Result<PathBuf, InfrastructureError> {
    for filename in CONFIG_CANDIDATES {
        let p = root.join(filename);
        if p.exists() {
            return Ok(p);
        }
    }
    Err(InfrastructureError::ConfigNotFound(format!(
        "No configuration file found in {:?}. Checked: {:?}",
        root, CONFIG_CANDIDATES
    )))
}

fn validate(config: &ProjectConfig) -> Result<(), InfrastructureError> {
    config
        .validate()
        .map_err(|e| InfrastructureError::ConfigError(e.to_string()))
}

// --- LOGIQUE GÉNÉRIQUE ---

/// Charge un fragment de configuration typé depuis un fichier.
fn load_fragment<T: DeserializeOwned>(path: &Path) -> Result<T, InfrastructureError> {
    let content = fs::read_to_string(path)?;
    serde_yaml::from_str(&content).map_err(|source| InfrastructureError::YamlError {
        path: path.display().to_string(),
        source,
    })
}

/// Shape of `quality.yml`. Each present key replaces the matching part of the
/// inline `quality:` block.
#[derive(Debug, Deserialize, Default)]
struct QualitySatellite {
    freshness_window_secs: Option<u64>,
    rules: Option<Vec<QualityRule>>,
    datasets: Option<BTreeMap<DatasetKind, DatasetRules>>,
}

fn load_satellite_configs(
    config: &mut ProjectConfig,
    config_dir: &Path,
) -> Result<(), InfrastructureError> {
    let qual_path = config_dir.join("quality.yml");
    if !qual_path.exists() {
        return Ok(());
    }

    let satellite: QualitySatellite = load_fragment(&qual_path)?;
    if let Some(window) = satellite.freshness_window_secs {
        config.quality.freshness_window_secs = window;
    }
    if let Some(rules) = satellite.rules {
        config.quality.rules = rules;
    }
    if let Some(datasets) = satellite.datasets {
        config.quality.datasets = datasets;
    }
    info!(path = ?qual_path, "Quality rules loaded");

    Ok(())
}

fn apply_env_overrides<F>(config: &mut ProjectConfig, env: F) -> Result<(), InfrastructureError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(val) = env(ENV_REPORTS_PATH) {
        info!(old = ?config.reports_path, new = ?val, "Overriding reports path via ENV");
        config.reports_path = val;
    }
    if let Some(val) = env(ENV_WAREHOUSE_PATH) {
        info!(old = ?config.warehouse_path, new = ?val, "Overriding warehouse path via ENV");
        config.warehouse_path = val;
    }
    if let Some(val) = env(ENV_FRESHNESS_WINDOW) {
        let secs = val.trim().parse::<u64>().map_err(|e| {
            InfrastructureError::ConfigError(format!(
                "{} must be a whole number of seconds, got '{}': {}",
                ENV_FRESHNESS_WINDOW, val, e
            ))
        })?;
        info!(old = config.quality.freshness_window_secs, new = secs, "Overriding freshness window via ENV");
        config.quality.freshness_window_secs = secs;
    }
    Ok(())
}
