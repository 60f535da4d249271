//! TVM Engine CLI
//!
//! Reads an engine request (or a JSON array of requests with --batch) from a
//! file or stdin and prints the JSON response.
//!
//! Usage: tvm_engine [--input FILE] [--batch] [--pretty]

use anyhow::{Context, Result};
use clap::Parser;
use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;

use tvm_engine::{EngineRequest, Evaluator, RateSolverConfig};

#[derive(Debug, Parser)]
#[command(name = "tvm_engine", version, about = "Time-value-of-money calculator engine")]
struct Cli {
    /// Request file; reads stdin when omitted
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Input is a JSON array of requests evaluated in parallel
    #[arg(long)]
    batch: bool,

    /// Pretty-print the response
    #[arg(long)]
    pretty: bool,

    /// Override the rate search iteration budget
    #[arg(long)]
    max_iterations: Option<u32>,

    /// Override the rate search tolerance
    #[arg(long)]
    tolerance: Option<f64>,
}

fn read_input(path: Option<&PathBuf>) -> Result<String> {
    match path {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display())),
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("failed to read stdin")?;
            Ok(buf)
        }
    }
}

fn to_json<T: serde::Serialize>(value: &T, pretty: bool) -> Result<String> {
    let json = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    Ok(json)
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    let mut config = RateSolverConfig::from_env();
    if let Some(max_iterations) = cli.max_iterations {
        config.max_iterations = max_iterations;
    }
    if let Some(tolerance) = cli.tolerance {
        config.tolerance = tolerance;
    }
    let evaluator = Evaluator::with_config(config);

    let raw = read_input(cli.input.as_ref())?;

    let output = if cli.batch {
        let requests: Vec<EngineRequest> =
            serde_json::from_str(&raw).context("input is not a JSON array of engine requests")?;
        to_json(&evaluator.evaluate_batch(&requests), cli.pretty)?
    } else {
        let request: EngineRequest =
            serde_json::from_str(&raw).context("input is not a valid engine request")?;
        to_json(&evaluator.evaluate(&request), cli.pretty)?
    };

    println!("{}", output);
    Ok(())
}
