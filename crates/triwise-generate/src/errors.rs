use thiserror::Error;

use crate::output::ExportError;

/// Errors emitted by the generation engine.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error(transparent)]
    Core(#[from] triwise_core::Error),
    #[error("invalid scenario: {0}")]
    InvalidScenario(String),
    #[error("export error: {0}")]
    Export(#[from] ExportError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}
