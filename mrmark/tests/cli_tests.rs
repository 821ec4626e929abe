use anyhow::{Context, Result};
use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

const STALE_POSTS: &str = r#"[
  {"id": "1", "timestamp": "2020-01-01T00:00:00Z", "platform": "instagram",
   "like_count": 5, "comment_count": 1, "media_url": "https://cdn.example/1.jpg"},
  {"id": "2", "timestamp": "2020-01-01T00:01:00Z", "platform": "twitter",
   "like_count": 0, "comment_count": 0}
]"#;

/// Scratch project directory for one CLI invocation.
struct MrMarkTestEnv {
    tmp: TempDir,
}

impl MrMarkTestEnv {
    fn new() -> Result<Self> {
        Ok(Self {
            tmp: tempfile::tempdir()?,
        })
    }

    fn root(&self) -> &Path {
        self.tmp.path()
    }

    fn write(&self, relative: &str, content: &str) -> Result<PathBuf> {
        let path = self.root().join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, content)?;
        Ok(path)
    }

    fn mrmark(&self) -> Command {
        let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("mrmark"));
        cmd.current_dir(self.root())
            .env_remove("MRMARK_REPORTS_PATH")
            .env_remove("MRMARK_WAREHOUSE_PATH")
            .env_remove("MRMARK_FRESHNESS_WINDOW_SECS");
        cmd
    }

    fn reports(&self, dir: &str) -> Result<Vec<PathBuf>> {
        let mut files: Vec<PathBuf> = fs::read_dir(self.root().join(dir))?
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .collect();
        files.sort();
        Ok(files)
    }
}

fn stdout_json(output: &std::process::Output) -> Result<serde_json::Value> {
    let stdout = String::from_utf8(output.stdout.clone())?;
    serde_json::from_str(&stdout).context("stdout is not valid JSON")
}

#[test]
fn test_check_json_output_for_stale_posts() -> Result<()> {
    let env = MrMarkTestEnv::new()?;
    let data = env.write("posts_0301.json", STALE_POSTS)?;

    let output = env
        .mrmark()
        .args(["check", "--no-report", "--format", "json"])
        .arg(&data)
        .output()?;
    assert!(output.status.success());

    let results = stdout_json(&output)?;
    let result = &results[0];
    assert_eq!(result["collection_id"], "posts_0301");
    assert_eq!(result["total_records"], 2);
    assert_eq!(result["metrics"]["completeness"], 1.0);
    assert_eq!(result["metrics"]["timeliness"], 0.0);

    let overall = result["overall_score"].as_f64().context("missing overall_score")?;
    assert!((overall - 5.0 / 6.0).abs() < 1e-9);
    assert_eq!(result["status"], "good");

    let issues = result["issues"].as_array().context("missing issues")?;
    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0]["category"], "timeliness");
    assert_eq!(issues[0]["severity"], "critical");
    Ok(())
}

#[test]
fn test_check_scans_data_dir_and_writes_reports() -> Result<()> {
    let env = MrMarkTestEnv::new()?;
    env.write("data/raw/a.json", STALE_POSTS)?;
    env.write("data/raw/nested/b.json", r#"{"posts": []}"#)?;

    env.mrmark()
        .args(["check", "--project-dir", "."])
        .assert()
        .success()
        .stdout(predicate::str::contains("a").and(predicate::str::contains("b")));

    let reports = env.reports("data/reports/quality")?;
    assert_eq!(reports.len(), 2);
    assert!(reports.iter().all(|p| {
        p.file_name()
            .map(|n| n.to_string_lossy().starts_with("quality_report_"))
            .unwrap_or(false)
    }));
    Ok(())
}

#[test]
fn test_reports_path_env_override() -> Result<()> {
    let env = MrMarkTestEnv::new()?;
    let data = env.write("batch.json", STALE_POSTS)?;

    env.mrmark()
        .env("MRMARK_REPORTS_PATH", "custom/out")
        .arg("check")
        .arg(&data)
        .assert()
        .success();

    assert_eq!(env.reports("custom/out")?.len(), 1);
    Ok(())
}

#[test]
fn test_malformed_file_is_reported_not_fatal() -> Result<()> {
    let env = MrMarkTestEnv::new()?;
    let broken = env.write("broken.json", "{ nope")?;
    let good = env.write("good.json", STALE_POSTS)?;

    let output = env
        .mrmark()
        .args(["check", "--no-report", "--format", "json"])
        .arg(&broken)
        .arg(&good)
        .output()?;
    assert!(output.status.success());

    let results = stdout_json(&output)?;
    assert_eq!(results[0]["overall_score"], 0.0);
    assert!(results[0]["failure"].is_string());
    assert_eq!(results[0]["issues"][0]["category"], "input");
    assert!(results[1].get("failure").is_none());
    Ok(())
}

#[test]
fn test_fail_under_gate() -> Result<()> {
    let env = MrMarkTestEnv::new()?;
    let data = env.write("stale.json", STALE_POSTS)?;

    env.mrmark()
        .args(["check", "--no-report", "--fail-under", "0.9"])
        .arg(&data)
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("below 0.9"));

    env.mrmark()
        .args(["check", "--no-report", "--fail-under", "0.8"])
        .arg(&data)
        .assert()
        .success();
    Ok(())
}

#[test]
fn test_project_config_changes_freshness_window() -> Result<()> {
    let env = MrMarkTestEnv::new()?;
    // A window large enough to make 2020 timestamps fresh.
    env.write(
        "mrmark.yaml",
        "name: sns\nquality:\n  freshness_window_secs: 3153600000\n",
    )?;
    let data = env.write("stale.json", STALE_POSTS)?;

    let output = env
        .mrmark()
        .args(["check", "--no-report", "--format", "json"])
        .arg(&data)
        .output()?;
    assert!(output.status.success());
    let results = stdout_json(&output)?;
    assert_eq!(results[0]["metrics"]["timeliness"], 1.0);
    assert_eq!(results[0]["overall_score"], 1.0);
    Ok(())
}

#[test]
fn test_invalid_threshold_is_rejected() -> Result<()> {
    let env = MrMarkTestEnv::new()?;
    env.write(
        "mrmark.yaml",
        "quality:\n  rules:\n    - name: accuracy\n      threshold: 1.5\n",
    )?;

    env.mrmark().arg("rules").assert().failure();
    Ok(())
}

#[test]
fn test_rules_lists_thresholds_and_checks() -> Result<()> {
    let env = MrMarkTestEnv::new()?;
    env.mrmark()
        .args(["rules", "--kind", "sns_posts"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("completeness")
                .and(predicate::str::contains("0.95"))
                .and(predicate::str::contains("media_url starts with"))
                .and(predicate::str::contains("Freshness window: 300s")),
        );
    Ok(())
}

#[test]
fn test_report_without_warehouse_fails() -> Result<()> {
    let env = MrMarkTestEnv::new()?;
    env.mrmark()
        .arg("report")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Warehouse not found"));
    Ok(())
}

#[test]
fn test_report_over_duckdb_warehouse() -> Result<()> {
    let env = MrMarkTestEnv::new()?;
    let db_path = env.root().join("warehouse.duckdb");
    {
        let conn = duckdb::Connection::open(&db_path)?;
        conn.execute_batch(
            "CREATE TABLE hashtags (hashtag VARCHAR, platform VARCHAR, post_count INTEGER, \
             engagement_count INTEGER, trend_score DOUBLE, created_at TIMESTAMP);
             INSERT INTO hashtags VALUES ('#rust', 'twitter', 10, 50, 0.7, TIMESTAMP '2020-01-01 00:00:00');",
        )?;
    }

    let output = env
        .mrmark()
        .args(["report", "--tables", "hashtags,trends", "--format", "json", "--db-path"])
        .arg(&db_path)
        .output()?;
    assert!(output.status.success());

    let report = stdout_json(&output)?;
    assert!(report["table_quality"]["trends"]["failure"].is_string());
    assert_eq!(report["table_quality"]["hashtags"]["total_records"], 1);
    // Only hashtags is scored: every dimension passes except timeliness.
    let overall = report["overall_score"].as_f64().context("missing overall_score")?;
    assert!((overall - 5.0 / 6.0).abs() < 1e-9);
    assert!(
        report["summary"]
            .as_str()
            .context("missing summary")?
            .starts_with("Overall quality score: 0.833")
    );

    assert_eq!(env.reports("data/reports/quality")?.len(), 1);
    Ok(())
}
