//! Call-plan synthesis CLI.
//!
//! **Commands**
//! - `analyze <PATH>...`: analyze interface documents in parallel and print one
//!   result per file, in input order
//! - `viability <PATH>`: cheap count of public entry functions callable with literals only
//! - `oracle <PATH> [--executions <PATH>]`: ceiling rates and an exposure ranking
//!
//! JSON results go to stdout; logs go to stderr (`RUST_LOG`, or `--verbose`).
use anyhow::{anyhow, Context, Result};
use clap::Parser;
use rayon::prelude::*;
use serde::Serialize;
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use sui_package_interface::load_interface;
use sui_ptb_synth::args::{AnalyzeCmd, Cli, Commands, OracleCmd, ViabilityCmd};
use sui_ptb_synth::benchmark::analyzer::{
    analyze_interface_value, compute_package_viability, PackageAnalysis, PackageViability,
};
use sui_ptb_synth::benchmark::oracle::{
    outcomes_from_analysis, rank_for_exposure, ExecutionRecord, FunctionDifficulty, PackageOracle,
};
use sui_ptb_synth::benchmark::synthesizer::SynthesisConfig;

#[derive(Serialize)]
struct FileAnalysis {
    path: PathBuf,
    #[serde(flatten)]
    analysis: PackageAnalysis,
}

#[derive(Serialize)]
struct ViabilityReport {
    path: PathBuf,
    package_id: Option<String>,
    #[serde(flatten)]
    viability: PackageViability,
}

#[derive(Serialize)]
struct OracleReport {
    path: PathBuf,
    package_id: Option<String>,
    unmatched_records: usize,
    duplicate_records: usize,
    oracle: PackageOracle,
    ranking: Vec<FunctionDifficulty>,
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
}

fn read_json(path: &Path) -> Result<Value> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("failed to parse {}", path.display()))
}

fn print_json<T: Serialize>(value: &T, pretty: bool) -> Result<()> {
    let out = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{}", out);
    Ok(())
}

fn run_analyze(cmd: &AnalyzeCmd, pretty: bool) -> Result<()> {
    let config = cmd.synthesis.config();
    let policy = cmd.synthesis.policy();
    debug!(
        files = cmd.files.len(),
        max_depth = config.max_depth,
        policy = policy.name(),
        "analyzing interfaces"
    );

    // Packages are independent; collect keeps input order.
    let results = cmd
        .files
        .par_iter()
        .map(|path| {
            let doc = read_json(path)?;
            Ok(FileAnalysis {
                path: path.clone(),
                analysis: analyze_interface_value(&doc, &config, policy.as_ref()),
            })
        })
        .collect::<Result<Vec<_>>>()?;

    print_json(&results, pretty)
}

fn run_viability(cmd: &ViabilityCmd, pretty: bool) -> Result<()> {
    let interface = load_interface(&cmd.file)?;
    let config = SynthesisConfig::default();
    let report = ViabilityReport {
        path: cmd.file.clone(),
        package_id: interface.package_id.clone(),
        viability: compute_package_viability(&interface, &config.well_known),
    };
    print_json(&report, pretty)
}

fn run_oracle(cmd: &OracleCmd, pretty: bool) -> Result<()> {
    cmd.validate().map_err(|e| anyhow!(e))?;

    let doc = read_json(&cmd.file)?;
    let config = cmd.synthesis.config();
    let policy = cmd.synthesis.policy();
    let analysis = analyze_interface_value(&doc, &config, policy.as_ref());

    let executions: Vec<ExecutionRecord> = match &cmd.executions {
        Some(path) => serde_json::from_value(read_json(path)?)
            .with_context(|| format!("invalid execution records in {}", path.display()))?,
        None => Vec::new(),
    };

    let inputs = outcomes_from_analysis(&analysis, &executions);
    let oracle = PackageOracle::from_outcomes(&inputs.outcomes);
    let ranking = rank_for_exposure(
        &oracle,
        cmd.strategy.into(),
        cmd.limit,
        cmd.exclude_impossible,
    );

    let report = OracleReport {
        path: cmd.file.clone(),
        package_id: analysis.package_id.clone(),
        unmatched_records: inputs.unmatched_records,
        duplicate_records: inputs.duplicate_records,
        oracle,
        ranking,
    };
    print_json(&report, pretty)
}

fn main() -> Result<()> {
    let Cli {
        command,
        pretty,
        verbose,
    } = Cli::parse();
    init_tracing(verbose);
    debug!(command = command.name(), "starting");

    match &command {
        Commands::Analyze(cmd) => run_analyze(cmd, pretty),
        Commands::Viability(cmd) => run_viability(cmd, pretty),
        Commands::Oracle(cmd) => run_oracle(cmd, pretty),
    }
}
