use serde::{Deserialize, Serialize};

use triwise_core::{DEFAULT_SPREAD, PartitionPolicy};
use triwise_generate::{DocumentOptions, ExportFormat};

use super::atomic::write_bytes_atomic;
use super::{WorkspacePaths, WorkspaceResult};

/// Workspace defaults stored in `config/settings.toml`. Scenario options
/// and command-line flags take precedence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkspaceSettings {
    pub strict: bool,
    /// Fair-bounded spread for the category split.
    pub spread: u64,
    /// Sub-category share bounds, as fractions of the unallocated rest.
    pub sub_category_min: f64,
    pub sub_category_max: f64,
    pub formats: Vec<ExportFormat>,
    pub document_title: String,
    pub page_lines: usize,
    /// Run used by `audit` when no input is given.
    pub active_run_id: Option<String>,
}

impl Default for WorkspaceSettings {
    fn default() -> Self {
        let document = DocumentOptions::default();
        Self {
            strict: false,
            spread: DEFAULT_SPREAD,
            sub_category_min: 0.1,
            sub_category_max: 0.7,
            formats: ExportFormat::ALL.to_vec(),
            document_title: document.title,
            page_lines: document.page_lines,
            active_run_id: None,
        }
    }
}

impl WorkspaceSettings {
    pub fn category_policy(&self) -> PartitionPolicy {
        PartitionPolicy::FairBounded {
            spread: self.spread,
        }
    }

    pub fn sub_category_policy(&self) -> PartitionPolicy {
        PartitionPolicy::ProportionalOfRemaining {
            min: self.sub_category_min,
            max: self.sub_category_max,
        }
    }

    pub fn document_options(&self) -> DocumentOptions {
        DocumentOptions {
            title: self.document_title.clone(),
            page_lines: self.page_lines,
        }
    }
}

pub fn load_or_create_settings(paths: &WorkspacePaths) -> WorkspaceResult<WorkspaceSettings> {
    let path = paths.settings_path();
    if path.exists() {
        let content = std::fs::read_to_string(&path)?;
        let settings: WorkspaceSettings = toml::from_str(&content)?;
        return Ok(settings);
    }

    let settings = WorkspaceSettings::default();
    save_settings(paths, &settings)?;
    Ok(settings)
}

pub fn save_settings(paths: &WorkspacePaths, settings: &WorkspaceSettings) -> WorkspaceResult<()> {
    let encoded = toml::to_string_pretty(settings)?;
    write_bytes_atomic(&paths.settings_path(), encoded.as_bytes())
}
