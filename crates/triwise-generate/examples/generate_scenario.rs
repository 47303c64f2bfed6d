use std::env;
use std::path::PathBuf;

use triwise_generate::{GenerateOptions, GenerationEngine};
use triwise_plan::load_scenario;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let mut args = env::args().skip(1);
    let mut scenario_path: Option<PathBuf> = None;
    let mut out_dir: Option<PathBuf> = None;
    let mut seed: Option<u64> = None;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--scenario" => scenario_path = args.next().map(PathBuf::from),
            "--out" => out_dir = args.next().map(PathBuf::from),
            "--seed" => seed = args.next().and_then(|value| value.parse().ok()),
            _ => {
                if scenario_path.is_none() {
                    scenario_path = Some(PathBuf::from(arg));
                } else {
                    return Err("unexpected argument".into());
                }
            }
        }
    }

    let scenario_path = scenario_path.ok_or("missing --scenario path")?;
    let validated = load_scenario(&scenario_path)?;
    for warning in &validated.warnings {
        eprintln!("warning [{}] {}: {}", warning.code, warning.path, warning.message);
    }

    let mut options = GenerateOptions {
        seed,
        ..GenerateOptions::default()
    };
    if let Some(out_dir) = out_dir {
        options.out_dir = out_dir;
    }

    let result = GenerationEngine::new(options).run(&validated.scenario)?;
    println!("run_dir={}", result.run_dir.display());
    println!("records={}", result.report.records);
    Ok(())
}
