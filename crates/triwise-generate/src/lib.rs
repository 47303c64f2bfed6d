//! Partitioning, enumeration and export for triwise.
//!
//! The partitioner, shuffle and enumerator are pure and take an explicit
//! RNG. The engine wraps them into seeded runs that write artifacts and a
//! `generation_report.json`.

pub mod engine;
pub mod enumerate;
pub mod errors;
pub mod model;
pub mod output;
pub mod partition;
pub mod shuffle;

pub use engine::{GenerationEngine, GenerationResult, RunHandle};
pub use enumerate::{EnumerateMode, Enumeration, Enumerator, OverAllocation, enumerate_records};
pub use errors::GenerationError;
pub use model::{ArtifactReport, GenerateOptions, GenerationIssue, GenerationReport};
pub use output::{DocumentOptions, ExportError, ExportFormat, export_to_path, write_records};
pub use partition::partition;
pub use shuffle::shuffled;
