//! Audit of triwise result sets.
//!
//! Re-checks the allocation invariants of an exported result set and
//! writes `audit_metrics.json` plus a markdown report.

pub mod audit;
pub mod engine;
pub mod errors;
pub mod metrics;
pub mod model;
pub mod report;

pub use audit::{AuditOutcome, audit_records, infer_shape};
pub use engine::{AuditEngine, load_records};
pub use errors::AuditError;
pub use metrics::{AuditMetrics, CheckStats, CheckSummary, METRICS_VERSION};
pub use model::{AuditOptions, AuditResult, Shape, Violation};
pub use report::render_report;
