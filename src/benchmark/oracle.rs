//! # Achievability Oracle
//!
//! Turns recorded per-function outcomes into a package ceiling and a
//! difficulty ranking that does not depend on any particular calling agent.
//!
//! Two tiers are tracked:
//!
//! | Tier | Meaning |
//! |------|---------|
//! | A | arguments were synthesized and a type-correct call was assembled |
//! | B | the assembled call also executed without aborting |
//!
//! A function whose synthesis needed a live object counts toward tier A
//! (the call type-checks) but can never reach tier B here.
//!
//! ## Difficulty score
//!
//! Additive, clamped to `[0, 1]`:
//!
//! - `0.04` per parameter, capped at `0.2`
//! - `+0.15` with type parameters
//! - `+0.2` when any parameter needs a live object
//! - `+0.1` per constructor hop on the deepest chain
//! - `+0.05` per system value (shared object, sender coin, context)
//! - `+0.1` when the call was synthesized but its execution aborted
//!
//! Functions without a synthesis path are pinned to `1.0` and
//! [`DifficultyLevel::Impossible`].

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet, VecDeque};
use sui_synth_types::address::parse_address;
use sui_synth_types::AccountAddress;
use tracing::warn;

use crate::benchmark::analyzer::PackageAnalysis;
use crate::benchmark::errors::RejectionReason;
use crate::benchmark::synthesizer::Resolution;

// =============================================================================
// Inputs
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SynthesisStatus {
    /// No type-correct call could be assembled.
    NotSynthesizable,
    /// Tier A only.
    SynthesizableOnly,
    /// Tier B.
    Executed,
}

impl SynthesisStatus {
    pub fn is_synthesizable(&self) -> bool {
        !matches!(self, SynthesisStatus::NotSynthesizable)
    }
}

/// One function's recorded outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionOutcome {
    pub module: String,
    pub function: String,
    pub status: SynthesisStatus,
    /// Resolution descriptor per parameter.
    #[serde(default)]
    pub params: Vec<Resolution>,
    #[serde(default)]
    pub has_type_params: bool,
}

/// Result of running one assembled call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionRecord {
    pub target: String,
    pub success: bool,
}

// =============================================================================
// Difficulty
// =============================================================================

/// Eight ordered bins, easiest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DifficultyLevel {
    Trivial,
    Simple,
    Moderate,
    Complex,
    Challenging,
    Difficult,
    VeryDifficult,
    Impossible,
}

impl DifficultyLevel {
    /// Bucket a score. Never yields `Impossible`; that level is only assigned
    /// to functions without a synthesis path.
    pub fn from_score(score: f64) -> Self {
        if score < 0.1 {
            DifficultyLevel::Trivial
        } else if score < 0.2 {
            DifficultyLevel::Simple
        } else if score < 0.3 {
            DifficultyLevel::Moderate
        } else if score < 0.45 {
            DifficultyLevel::Complex
        } else if score < 0.6 {
            DifficultyLevel::Challenging
        } else if score < 0.8 {
            DifficultyLevel::Difficult
        } else {
            DifficultyLevel::VeryDifficult
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DifficultyFactors {
    pub param_count: usize,
    pub has_type_params: bool,
    pub requires_object: bool,
    /// Hops on the deepest constructor chain among the parameters.
    pub constructor_depth: usize,
    pub system_values: usize,
    pub execution_failed: bool,
}

impl DifficultyFactors {
    fn from_outcome(outcome: &FunctionOutcome) -> Self {
        let requires_object = outcome.params.contains(&Resolution::Object);
        Self {
            param_count: outcome.params.len(),
            has_type_params: outcome.has_type_params,
            requires_object,
            constructor_depth: outcome
                .params
                .iter()
                .map(Resolution::constructor_hops)
                .max()
                .unwrap_or(0),
            system_values: outcome
                .params
                .iter()
                .filter(|r| **r == Resolution::SystemValue)
                .count(),
            execution_failed: outcome.status == SynthesisStatus::SynthesizableOnly
                && !requires_object,
        }
    }

    fn score(&self) -> f64 {
        let mut score = (0.04 * self.param_count as f64).min(0.2);
        if self.has_type_params {
            score += 0.15;
        }
        if self.requires_object {
            score += 0.2;
        }
        score += 0.1 * self.constructor_depth as f64;
        score += 0.05 * self.system_values as f64;
        if self.execution_failed {
            score += 0.1;
        }
        (score.clamp(0.0, 1.0) * 10_000.0).round() / 10_000.0
    }
}

/// Computed once per oracle; recomputation yields a fresh value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionDifficulty {
    pub module: String,
    pub function: String,
    pub status: SynthesisStatus,
    pub score: f64,
    pub level: DifficultyLevel,
    pub factors: DifficultyFactors,
}

/// Score one outcome.
pub fn difficulty(outcome: &FunctionOutcome) -> FunctionDifficulty {
    let factors = DifficultyFactors::from_outcome(outcome);
    let (score, level) = if outcome.status.is_synthesizable() {
        let score = factors.score();
        (score, DifficultyLevel::from_score(score))
    } else {
        (1.0, DifficultyLevel::Impossible)
    };
    FunctionDifficulty {
        module: outcome.module.clone(),
        function: outcome.function.clone(),
        status: outcome.status,
        score,
        level,
        factors,
    }
}

// =============================================================================
// Package Oracle
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PackageOracle {
    pub total_functions: usize,
    pub synthesis_possible: usize,
    pub synthesis_impossible: usize,
    pub execution_possible: usize,
    /// Synthesized, not executed, and a live object was required.
    pub blocked_by_objects: usize,
    /// Synthesized without objects, but execution aborted.
    pub execution_failed: usize,
    pub max_synthesis_rate: f64,
    pub max_execution_rate: f64,
    pub difficulty_distribution: BTreeMap<DifficultyLevel, usize>,
    /// Outcomes ignored because the same `module::function` was already seen.
    pub duplicate_outcomes: usize,
    /// Hardest first; ties keep input order.
    pub functions: Vec<FunctionDifficulty>,
}

impl PackageOracle {
    pub fn from_outcomes(outcomes: &[FunctionOutcome]) -> Self {
        let mut oracle = PackageOracle::default();
        let mut seen = HashSet::new();

        for outcome in outcomes {
            if !seen.insert((outcome.module.as_str(), outcome.function.as_str())) {
                warn!(
                    module = %outcome.module,
                    function = %outcome.function,
                    "duplicate outcome ignored"
                );
                oracle.duplicate_outcomes += 1;
                continue;
            }

            let scored = difficulty(outcome);
            oracle.total_functions += 1;
            match outcome.status {
                SynthesisStatus::NotSynthesizable => oracle.synthesis_impossible += 1,
                SynthesisStatus::Executed => {
                    oracle.synthesis_possible += 1;
                    oracle.execution_possible += 1;
                }
                SynthesisStatus::SynthesizableOnly => {
                    oracle.synthesis_possible += 1;
                    if scored.factors.requires_object {
                        oracle.blocked_by_objects += 1;
                    } else {
                        oracle.execution_failed += 1;
                    }
                }
            }
            *oracle.difficulty_distribution.entry(scored.level).or_insert(0) += 1;
            oracle.functions.push(scored);
        }

        if oracle.total_functions > 0 {
            let total = oracle.total_functions as f64;
            oracle.max_synthesis_rate = oracle.synthesis_possible as f64 / total;
            oracle.max_execution_rate = oracle.execution_possible as f64 / total;
        }
        // Stable: equal scores keep input order.
        oracle
            .functions
            .sort_by(|a, b| b.score.total_cmp(&a.score));
        oracle
    }
}

// =============================================================================
// Exposure Ranking
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExposureStrategy {
    #[default]
    Hardest,
    Easiest,
    /// Round-robin across levels, easiest level first.
    Balanced,
    /// Only functions that executed, hardest first.
    ExecutableOnly,
}

/// Select functions to surface first. The oracle is left untouched.
pub fn rank_for_exposure(
    oracle: &PackageOracle,
    strategy: ExposureStrategy,
    limit: Option<usize>,
    exclude_impossible: bool,
) -> Vec<FunctionDifficulty> {
    let pool = oracle
        .functions
        .iter()
        .filter(|f| !(exclude_impossible && f.level == DifficultyLevel::Impossible));

    let mut ranked: Vec<FunctionDifficulty> = match strategy {
        ExposureStrategy::Hardest => pool.cloned().collect(),
        ExposureStrategy::Easiest => {
            let mut v: Vec<_> = pool.cloned().collect();
            v.sort_by(|a, b| a.score.total_cmp(&b.score));
            v
        }
        ExposureStrategy::ExecutableOnly => pool
            .filter(|f| f.status == SynthesisStatus::Executed)
            .cloned()
            .collect(),
        ExposureStrategy::Balanced => {
            let mut by_level: BTreeMap<DifficultyLevel, VecDeque<&FunctionDifficulty>> =
                BTreeMap::new();
            for f in pool {
                by_level.entry(f.level).or_default().push_back(f);
            }
            let mut out = Vec::with_capacity(oracle.functions.len());
            while by_level.values().any(|q| !q.is_empty()) {
                for queue in by_level.values_mut() {
                    if let Some(f) = queue.pop_front() {
                        out.push(f.clone());
                    }
                }
            }
            out
        }
    };

    if let Some(limit) = limit {
        ranked.truncate(limit);
    }
    ranked
}

// =============================================================================
// Analysis Bridge
// =============================================================================

/// Oracle outcomes joined from an analysis and an execution pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OracleInputs {
    pub outcomes: Vec<FunctionOutcome>,
    /// Execution records naming a function with no assembled call.
    pub unmatched_records: usize,
    /// Additional records for a target already seen.
    pub duplicate_records: usize,
}

/// `address::module::function` with the address in parsed form, so short and
/// full-length spellings of the same target compare equal.
fn target_key(target: &str) -> Option<(AccountAddress, &str, &str)> {
    let mut parts = target.splitn(3, "::");
    let address = parse_address(parts.next()?)?;
    Some((address, parts.next()?, parts.next()?))
}

/// Join a [`PackageAnalysis`] with execution records.
///
/// Functions rejected with `not_public_entry` are outside the callable surface
/// and are left out. A target counts as executed when any of its records
/// succeeded. Record targets may spell the address in short or full form.
pub fn outcomes_from_analysis(
    analysis: &PackageAnalysis,
    executions: &[ExecutionRecord],
) -> OracleInputs {
    let mut inputs = OracleInputs::default();

    let planned: BTreeMap<_, _> = analysis
        .functions
        .iter()
        .filter(|f| f.has_plan())
        .filter_map(|f| Some((target_key(&f.target)?, f)))
        .collect();

    let mut executed: BTreeMap<&str, bool> = BTreeMap::new();
    for record in executions {
        let Some(f) = target_key(&record.target).and_then(|key| planned.get(&key).copied()) else {
            warn!(call = %record.target, "execution record for unknown or unsynthesized function");
            inputs.unmatched_records += 1;
            continue;
        };
        match executed.get_mut(f.target.as_str()) {
            Some(success) => {
                inputs.duplicate_records += 1;
                *success |= record.success;
            }
            None => {
                executed.insert(f.target.as_str(), record.success);
            }
        }
    }

    for f in &analysis.functions {
        if f.reasons.contains(&RejectionReason::NotPublicEntry) {
            continue;
        }
        let status = match (f.has_plan(), executed.get(f.target.as_str())) {
            (false, _) => SynthesisStatus::NotSynthesizable,
            (true, Some(true)) => SynthesisStatus::Executed,
            (true, _) => SynthesisStatus::SynthesizableOnly,
        };
        inputs.outcomes.push(FunctionOutcome {
            module: f.module.clone(),
            function: f.function.clone(),
            status,
            params: f.params.clone(),
            has_type_params: f.has_type_params,
        });
    }
    inputs
}
