use std::env;
use std::path::PathBuf;

use triwise_eval::{AuditEngine, AuditOptions};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut args = env::args().skip(1);
    let mut input: Option<PathBuf> = None;
    let mut lenient = false;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--run" => input = args.next().map(PathBuf::from),
            "--lenient" => lenient = true,
            _ => {
                if input.is_none() {
                    input = Some(PathBuf::from(arg));
                } else {
                    return Err("unexpected argument".into());
                }
            }
        }
    }

    let input = input.ok_or("missing --run path")?;
    let options = AuditOptions {
        strict: !lenient,
        write_violations: true,
        ..AuditOptions::default()
    };
    let result = AuditEngine::new(options).run(&input)?;

    println!("metrics_path={}", result.metrics_path.display());
    println!("report_path={}", result.report_path.display());
    if let Some(path) = result.violations_path {
        println!("violations_path={}", path.display());
    }
    Ok(())
}
