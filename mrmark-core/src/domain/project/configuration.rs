// src/domain/project/configuration.rs

use crate::domain::quality::QualityConfig;
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Deserialize, Serialize, Clone, Validate, PartialEq)]
pub struct ProjectConfig {
    #[serde(default = "default_name")]
    pub name: String,
    #[serde(default = "default_version")]
    pub version: String,

    #[serde(rename = "config-paths", default)]
    pub config_paths: Vec<String>,

    /// Where JSON quality reports are written.
    #[serde(rename = "reports-path", default = "default_reports_path")]
    pub reports_path: String,

    #[serde(rename = "warehouse-path", default = "default_warehouse_path")]
    pub warehouse_path: String,

    /// Directory scanned for collector output when no files are given.
    #[serde(rename = "data-path", default = "default_data_path")]
    pub data_path: String,

    #[serde(default)]
    #[validate(nested)]
    pub quality: QualityConfig,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            version: default_version(),
            config_paths: Vec::new(),
            reports_path: default_reports_path(),
            warehouse_path: default_warehouse_path(),
            data_path: default_data_path(),
            quality: QualityConfig::default(),
        }
    }
}

fn default_name() -> String {
    "mrmark".to_string()
}
fn default_version() -> String {
    "0.1.0".to_string()
}
fn default_reports_path() -> String {
    "data/reports/quality".to_string()
}
fn default_warehouse_path() -> String {
    "data/warehouse/warehouse.duckdb".to_string()
}
fn default_data_path() -> String {
    "data/raw".to_string()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::quality::Dimension;

    #[test]
    fn test_minimal_yaml_uses_defaults() {
        let config: ProjectConfig = serde_yaml::from_str("name: demo\n").unwrap();
        assert_eq!(config.name, "demo");
        assert_eq!(config.reports_path, "data/reports/quality");
        assert_eq!(config.warehouse_path, "data/warehouse/warehouse.duckdb");
        assert_eq!(config.data_path, "data/raw");
        assert_eq!(config.quality, QualityConfig::default());
    }

    #[test]
    fn test_inline_quality_block() {
        let yaml = r#"
name: demo
version: "2.0"
reports-path: out/reports
quality:
  freshness_window_secs: 600
  rules:
    - name: timeliness
      threshold: 0.5
      weight: 2.0
"#;
        let config: ProjectConfig = serde_yaml::from_str(yaml).unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.reports_path, "out/reports");
        assert_eq!(config.quality.freshness_window_secs, 600);
        assert_eq!(config.quality.rules[0].name, Dimension::Timeliness);
        assert_eq!(config.quality.rules[0].weight, 2.0);
    }

    #[test]
    fn test_negative_weight_fails_validation() {
        let yaml = r#"
quality:
  rules:
    - name: accuracy
      threshold: 0.9
      weight: -1.0
"#;
        let config: ProjectConfig = serde_yaml::from_str(yaml).unwrap();
        assert!(config.validate().is_err());
    }
}
