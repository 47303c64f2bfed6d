use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::process::Command;

use chrono::{DateTime, Utc};
use serde::Serialize;

use triwise_core::PartitionPolicy;
use triwise_generate::ExportFormat;

use super::RegistryResult;

/// Effective generation options recorded for a run.
#[derive(Debug, Clone, Serialize)]
pub struct RunOptions {
    pub strict: bool,
    pub seed: Option<u64>,
    pub formats: Vec<ExportFormat>,
    pub category_policy: PartitionPolicy,
    pub sub_category_policy: PartitionPolicy,
    pub document_title: String,
    pub page_lines: usize,
}

/// Metadata captured at run start.
#[derive(Debug, Clone)]
pub struct RunContext {
    pub run_id: String,
    pub started_at: DateTime<Utc>,
    pub run_dir: PathBuf,
    /// Scenario file, or the parameter store the factors came from.
    pub source: String,
    pub scenario_version: String,
    pub options: RunOptions,
}

/// JSON config written to each run directory.
#[derive(Debug, Serialize)]
pub struct RunConfig {
    pub run_id: String,
    pub started_at: String,
    pub engine: String,
    pub source: String,
    pub scenario_version: String,
    pub options: RunOptions,
    pub git: GitInfo,
}

/// Git metadata for reproducibility.
#[derive(Debug, Serialize)]
pub struct GitInfo {
    pub commit: Option<String>,
    pub dirty: Option<bool>,
}

/// Paths for run artifacts owned by the CLI.
#[derive(Debug, Clone)]
pub struct RunPaths {
    pub config_path: PathBuf,
    pub logs_path: PathBuf,
}

/// Write `config.json` and create `logs.ndjson` in an existing run directory.
pub fn start_run(ctx: &RunContext) -> RegistryResult<RunPaths> {
    let config_path = ctx.run_dir.join("config.json");
    let logs_path = ctx.run_dir.join("logs.ndjson");

    let config = RunConfig {
        run_id: ctx.run_id.clone(),
        started_at: ctx.started_at.to_rfc3339(),
        engine: format!("triwise {}", env!("CARGO_PKG_VERSION")),
        source: ctx.source.clone(),
        scenario_version: ctx.scenario_version.clone(),
        options: ctx.options.clone(),
        git: collect_git_info(),
    };

    write_json(&config_path, &config)?;

    OpenOptions::new()
        .create(true)
        .append(true)
        .open(&logs_path)?;

    Ok(RunPaths {
        config_path,
        logs_path,
    })
}

pub fn collect_git_info() -> GitInfo {
    let commit = Command::new("git")
        .args(["rev-parse", "HEAD"])
        .output()
        .ok()
        .and_then(|output| {
            if output.status.success() {
                Some(String::from_utf8_lossy(&output.stdout).trim().to_string())
            } else {
                None
            }
        })
        .filter(|value| !value.is_empty());

    let dirty = Command::new("git")
        .args(["status", "--porcelain"])
        .output()
        .ok()
        .filter(|output| output.status.success())
        .map(|output| !output.stdout.is_empty());

    GitInfo { commit, dirty }
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> RegistryResult<()> {
    let data = serde_json::to_vec_pretty(value)?;
    std::fs::write(path, data)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_config_and_log_file() {
        let run_dir = std::env::temp_dir().join(format!("triwise_registry_{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&run_dir).expect("run dir");

        let ctx = RunContext {
            run_id: "run-1".to_string(),
            started_at: Utc::now(),
            run_dir: run_dir.clone(),
            source: "config/parameters.json".to_string(),
            scenario_version: "0.1".to_string(),
            options: RunOptions {
                strict: false,
                seed: Some(7),
                formats: vec![ExportFormat::Csv],
                category_policy: PartitionPolicy::category_default(),
                sub_category_policy: PartitionPolicy::sub_category_default(),
                document_title: "Title".to_string(),
                page_lines: 60,
            },
        };
        let paths = start_run(&ctx).expect("start run");

        assert!(paths.logs_path.exists());
        let config: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&paths.config_path).expect("read"))
                .expect("json");
        assert_eq!(config["run_id"], "run-1");
        assert_eq!(config["options"]["seed"], 7);
        assert_eq!(config["options"]["formats"][0], "csv");
        assert!(config["git"].is_object());

        let _ = std::fs::remove_dir_all(run_dir);
    }
}
