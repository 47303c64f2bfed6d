use std::path::{Path, PathBuf};

use super::{WorkspaceError, WorkspaceResult};

/// Well-known locations inside a triwise workspace.
#[derive(Debug, Clone)]
pub struct WorkspacePaths {
    pub root: PathBuf,
    pub config_dir: PathBuf,
    pub runs_dir: PathBuf,
    pub scenarios_dir: PathBuf,
    pub logs_dir: PathBuf,
}

impl WorkspacePaths {
    pub fn new(root: PathBuf) -> Self {
        let config_dir = root.join("config");
        let runs_dir = root.join("runs");
        let scenarios_dir = root.join("scenarios");
        let logs_dir = root.join("logs");
        Self {
            root,
            config_dir,
            runs_dir,
            scenarios_dir,
            logs_dir,
        }
    }

    pub fn settings_path(&self) -> PathBuf {
        self.config_dir.join("settings.toml")
    }

    pub fn parameters_path(&self) -> PathBuf {
        self.config_dir.join("parameters.json")
    }

    pub fn cli_log_path(&self) -> PathBuf {
        self.logs_dir.join("cli.log")
    }

    pub fn ensure_dirs(&self) -> WorkspaceResult<()> {
        create_if_missing(&self.root)?;
        create_if_missing(&self.config_dir)?;
        create_if_missing(&self.runs_dir)?;
        create_if_missing(&self.scenarios_dir)?;
        create_if_missing(&self.logs_dir)?;
        Ok(())
    }

    /// Locate `runs/{timestamp}__run_{run_id}`.
    pub fn find_run_dir(&self, run_id: &str) -> WorkspaceResult<Option<PathBuf>> {
        if !self.runs_dir.is_dir() {
            return Ok(None);
        }
        let suffix = format!("__run_{run_id}");
        for entry in std::fs::read_dir(&self.runs_dir)? {
            let path = entry?.path();
            let matches = path
                .file_name()
                .is_some_and(|name| name.to_string_lossy().ends_with(&suffix));
            if matches && path.is_dir() {
                return Ok(Some(path));
            }
        }
        Ok(None)
    }
}

pub(super) fn create_if_missing(path: &Path) -> WorkspaceResult<()> {
    if path.exists() {
        return Ok(());
    }
    std::fs::create_dir_all(path).map_err(WorkspaceError::from)
}
