use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::benchmark::oracle::ExposureStrategy;
use crate::benchmark::synthesizer::{
    NativeCoinTypeArgs, RejectGenerics, SynthesisConfig, TypeArgPolicy,
};

#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum StrategyArg {
    /// Highest difficulty first.
    Hardest,
    /// Lowest difficulty first.
    Easiest,
    /// Round-robin across difficulty levels.
    Balanced,
    /// Only functions that executed, hardest first.
    ExecutableOnly,
}

impl From<StrategyArg> for ExposureStrategy {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::Hardest => ExposureStrategy::Hardest,
            StrategyArg::Easiest => ExposureStrategy::Easiest,
            StrategyArg::Balanced => ExposureStrategy::Balanced,
            StrategyArg::ExecutableOnly => ExposureStrategy::ExecutableOnly,
        }
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "sui-ptb-synth",
    author,
    version,
    about = "Synthesize call plans for Sui Move package interfaces"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pub pretty: bool,

    /// Debug logging on stderr (overridden by RUST_LOG)
    #[arg(long, short, global = true)]
    pub verbose: bool,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Analyze one or more interface documents and emit call plans
    Analyze(AnalyzeCmd),

    /// Count public entry functions callable with literal defaults only
    Viability(ViabilityCmd),

    /// Compute the achievability oracle from execution records
    Oracle(OracleCmd),
}

impl Commands {
    pub fn name(&self) -> &'static str {
        match self {
            Commands::Analyze(_) => "analyze",
            Commands::Viability(_) => "viability",
            Commands::Oracle(_) => "oracle",
        }
    }
}

/// Options shared by every command that runs synthesis.
#[derive(Debug, Clone, clap::Args)]
pub struct SynthesisArgs {
    /// Maximum constructor recursion depth (default: $SUI_PTB_SYNTH_MAX_DEPTH or 3)
    #[arg(long, value_name = "N")]
    pub max_depth: Option<usize>,

    /// Reject generic functions instead of instantiating them with SUI
    #[arg(long, default_value_t = false)]
    pub no_generics: bool,
}

impl SynthesisArgs {
    pub fn config(&self) -> SynthesisConfig {
        let config = SynthesisConfig::from_env();
        match self.max_depth {
            Some(depth) => config.with_max_depth(depth),
            None => config,
        }
    }

    pub fn policy(&self) -> Box<dyn TypeArgPolicy> {
        if self.no_generics {
            Box::new(RejectGenerics)
        } else {
            Box::new(NativeCoinTypeArgs)
        }
    }
}

#[derive(Debug, Parser)]
pub struct AnalyzeCmd {
    /// Interface JSON files; analyzed in parallel, reported in input order
    #[arg(value_name = "PATH", required = true)]
    pub files: Vec<PathBuf>,

    #[command(flatten)]
    pub synthesis: SynthesisArgs,
}

#[derive(Debug, Parser)]
pub struct ViabilityCmd {
    /// Interface JSON file
    #[arg(value_name = "PATH")]
    pub file: PathBuf,
}

#[derive(Debug, Parser)]
pub struct OracleCmd {
    /// Interface JSON file
    #[arg(value_name = "PATH")]
    pub file: PathBuf,

    /// Execution records: a JSON array of `{"target": .., "success": ..}`
    #[arg(long, value_name = "PATH")]
    pub executions: Option<PathBuf>,

    /// Ranking strategy for the exposure list
    #[arg(long, value_enum, default_value_t = StrategyArg::Hardest)]
    pub strategy: StrategyArg,

    /// Keep at most N ranked functions
    #[arg(long, value_name = "N")]
    pub limit: Option<usize>,

    /// Drop functions without a synthesis path from the ranking
    #[arg(long, default_value_t = false)]
    pub exclude_impossible: bool,

    #[command(flatten)]
    pub synthesis: SynthesisArgs,
}

impl OracleCmd {
    /// Validate CLI arguments for conflicts and requirements.
    pub fn validate(&self) -> Result<(), String> {
        if self.limit == Some(0) {
            return Err("--limit must be at least 1".to_string());
        }
        if self.strategy == StrategyArg::ExecutableOnly && self.executions.is_none() {
            return Err("--strategy executable-only requires --executions".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("sui-ptb-synth").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_analyze_accepts_many_files() {
        let cli = parse(&["analyze", "a.json", "b.json", "--max-depth", "5", "--pretty"]);
        assert!(cli.pretty);
        let Commands::Analyze(cmd) = cli.command else {
            panic!("expected analyze");
        };
        assert_eq!(cmd.files.len(), 2);
        assert_eq!(cmd.synthesis.config().max_depth, 5);
        assert_eq!(cmd.synthesis.policy().name(), "native_coin");
    }

    #[test]
    fn test_analyze_requires_a_file() {
        assert!(Cli::try_parse_from(["sui-ptb-synth", "analyze"]).is_err());
    }

    #[test]
    fn test_oracle_flags() {
        let cli = parse(&[
            "oracle",
            "iface.json",
            "--strategy",
            "executable-only",
            "--limit",
            "3",
            "--no-generics",
        ]);
        assert_eq!(cli.command.name(), "oracle");
        let Commands::Oracle(cmd) = cli.command else {
            panic!("expected oracle");
        };
        assert_eq!(cmd.strategy, StrategyArg::ExecutableOnly);
        assert_eq!(cmd.synthesis.policy().name(), "reject_generics");
        assert!(cmd.validate().is_err());
    }

    #[test]
    fn test_oracle_validate_limit() {
        let Commands::Oracle(cmd) = parse(&["oracle", "iface.json", "--limit", "0"]).command else {
            panic!("expected oracle");
        };
        assert_eq!(cmd.validate(), Err("--limit must be at least 1".to_string()));
    }
}
