mod commands;
mod registry;
mod workspace;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use thiserror::Error;

use triwise_eval::AuditError;
use triwise_generate::{ExportError, ExportFormat, GenerationError};
use triwise_plan::ScenarioError;

#[derive(Debug, Error)]
enum CliError {
    #[error("registry error: {0}")]
    Registry(#[from] registry::RegistryError),
    #[error("workspace error: {0}")]
    Workspace(#[from] workspace::WorkspaceError),
    #[error("scenario error: {0}")]
    Scenario(#[from] ScenarioError),
    #[error("generation error: {0}")]
    Generation(#[from] GenerationError),
    #[error("export error: {0}")]
    Export(#[from] ExportError),
    #[error("audit error: {0}")]
    Audit(#[from] AuditError),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

#[derive(Parser, Debug)]
#[command(
    name = "triwise",
    version,
    about = "Constrained random partitions over quantity, category and sub-category factors"
)]
struct Cli {
    /// Workspace root holding config/, runs/, scenarios/ and logs/.
    #[arg(long, global = true, default_value = ".")]
    workspace: PathBuf,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Edit the stored parameter list.
    #[command(subcommand)]
    Params(ParamsCommand),
    /// Enumerate combinations into a new run directory.
    Generate(GenerateArgs),
    /// Check a scenario file without generating.
    Validate(ValidateArgs),
    /// Re-check the allocation invariants of a run or export.
    Audit(AuditArgs),
    /// Print the scenario JSON Schema.
    Schema(SchemaArgs),
}

#[derive(Subcommand, Debug)]
enum ParamsCommand {
    /// Show stored parameters with their indices.
    List,
    /// Append a parameter.
    Add(AddParamArgs),
    /// Replace the values (and optionally the name) at an index.
    Update(UpdateParamArgs),
    /// Delete the parameter at an index.
    Remove {
        index: usize,
    },
    /// Delete every stored parameter.
    Clear,
    /// Replace the list with the default quantities, cuisines and ingredients.
    Seed,
    /// Write the stored parameters as a scenario file.
    Export(ExportParamsArgs),
}

#[derive(Args, Debug)]
struct AddParamArgs {
    /// Parameter name, e.g. "Total Vendor".
    #[arg(long)]
    name: String,
    /// Comma-separated values.
    #[arg(long, value_delimiter = ',', required = true, allow_hyphen_values = true)]
    values: Vec<String>,
}

#[derive(Args, Debug)]
struct UpdateParamArgs {
    index: usize,
    /// Comma-separated values.
    #[arg(long, value_delimiter = ',', required = true, allow_hyphen_values = true)]
    values: Vec<String>,
    /// New parameter name.
    #[arg(long)]
    name: Option<String>,
}

#[derive(Args, Debug)]
struct ExportParamsArgs {
    /// Output path. Defaults to scenarios/<id>.scenario.json.
    #[arg(long)]
    out: Option<PathBuf>,
    /// Seed to pin in the scenario.
    #[arg(long)]
    seed: Option<u64>,
    /// Scenario name.
    #[arg(long)]
    name: Option<String>,
}

#[derive(Args, Debug)]
struct GenerateArgs {
    /// Scenario file. Without it the stored parameters are used.
    #[arg(long)]
    scenario: Option<PathBuf>,
    /// Seed used when the scenario does not pin one.
    #[arg(long)]
    seed: Option<u64>,
    /// Fail on unresolved roles, duplicate labels and infeasible splits.
    #[arg(long, conflicts_with = "lenient")]
    strict: bool,
    /// Degrade to warnings even when settings or the scenario ask for strict.
    #[arg(long)]
    lenient: bool,
    /// Export formats (csv, text, document, json).
    #[arg(long = "format", value_delimiter = ',')]
    formats: Vec<ExportFormat>,
    /// Fair-bounded spread for the category split.
    #[arg(long)]
    spread: Option<u64>,
    /// Lines per page of the document export.
    #[arg(long)]
    page_lines: Option<usize>,
    /// Directory for run directories. Defaults to <workspace>/runs.
    #[arg(long)]
    out: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct ValidateArgs {
    scenario: PathBuf,
}

#[derive(Args, Debug)]
struct AuditArgs {
    /// Run directory, run id, or CSV/JSON export. Defaults to the last run.
    input: Option<PathBuf>,
    /// Report violations without failing.
    #[arg(long)]
    lenient: bool,
    /// Also write violations.json.
    #[arg(long)]
    write_violations: bool,
    /// Directory for the audit outputs.
    #[arg(long)]
    out: Option<PathBuf>,
    /// Examples listed in the markdown report.
    #[arg(long, default_value_t = 20)]
    max_examples: usize,
}

#[derive(Args, Debug)]
struct SchemaArgs {
    /// Write the schema to a file instead of stdout.
    #[arg(long)]
    out: Option<PathBuf>,
}

fn main() -> Result<(), CliError> {
    let cli = Cli::parse();
    let paths = workspace::WorkspacePaths::new(cli.workspace);

    match cli.command {
        Command::Params(command) => commands::run_params(&paths, command),
        Command::Generate(args) => commands::run_generate(&paths, args),
        Command::Validate(args) => commands::run_validate(&paths, args),
        Command::Audit(args) => commands::run_audit(&paths, args),
        Command::Schema(args) => commands::run_schema(&paths, args),
    }
}
