//! Scenario contracts and validation.
//!
//! A scenario bundles the three factors with an optional seed and partition
//! policy overrides. It is the document the parameter store exports and the
//! generation engine consumes.

pub mod errors;
pub mod model;
pub mod schema;
pub mod validate;

pub use errors::{IssueSeverity, Result, ScenarioError, ValidationIssue, ValidationReport};
pub use model::{SCENARIO_VERSION, Scenario, ScenarioOptions};
pub use schema::scenario_json_schema;
pub use validate::{
    ValidatedScenario, load_scenario, validate_scenario, validate_scenario_json,
    validate_scenario_semantics,
};
