//! Rejection codes and error types for argument synthesis.
//!
//! # Taxonomy
//!
//! | Scope | Type | Meaning |
//! |-------|------|---------|
//! | Package | [`RejectionReason::InterfaceMissingOrInvalid`], [`RejectionReason::NoCandidates`] | the whole package yields nothing |
//! | Function | [`RejectionReason`] | why one function has no runnable plan |
//! | Parameter | [`SynthError`] | why one parameter type has no value |
//! | Plan | [`PlanError`] | an externally built plan breaks ordering |
//!
//! Synthesis failures are values. Nothing here is raised across a package
//! boundary; callers decide how to report them.

use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// Rejection Reasons
// =============================================================================

/// Why a function (or a whole package) produced no runnable call plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectionReason {
    /// Neither `public` nor `entry`; not callable as a transaction step.
    NotPublicEntry,
    /// Generic function and the type-argument policy declined to fill it.
    HasTypeParams,
    /// A parameter had no value, hit the recursion bound, or only a placeholder.
    UnsupportedParamType,
    /// Package-level: no function produced a runnable plan.
    NoCandidates,
    /// Package-level: the interface document itself was unusable.
    InterfaceMissingOrInvalid,
    /// The function's declaration could not be decoded.
    MalformedFunction,
}

impl RejectionReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            RejectionReason::NotPublicEntry => "not_public_entry",
            RejectionReason::HasTypeParams => "has_type_params",
            RejectionReason::UnsupportedParamType => "unsupported_param_type",
            RejectionReason::NoCandidates => "no_candidates",
            RejectionReason::InterfaceMissingOrInvalid => "interface_missing_or_invalid",
            RejectionReason::MalformedFunction => "malformed_function",
        }
    }

}

impl fmt::Display for RejectionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Synthesis Errors
// =============================================================================

/// Hard failure for a single parameter type.
///
/// Both variants surface as [`RejectionReason::UnsupportedParamType`].
/// `DepthExceeded` is never softened into a placeholder. Discovery still
/// tries later constructor candidates and re-raises it only when none succeeds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SynthError {
    /// No strategy applies to this type (signer, bare type parameter,
    /// vector of a non-primitive, context outside the tail slot).
    Unsupported { type_str: String },
    /// The recursion bound was crossed while resolving `type_str`.
    DepthExceeded { depth: usize, type_str: String },
}

impl SynthError {
    pub fn unsupported(type_str: impl Into<String>) -> Self {
        SynthError::Unsupported {
            type_str: type_str.into(),
        }
    }

    pub fn type_str(&self) -> &str {
        match self {
            SynthError::Unsupported { type_str } | SynthError::DepthExceeded { type_str, .. } => {
                type_str
            }
        }
    }

    pub fn rejection_reason(&self) -> RejectionReason {
        RejectionReason::UnsupportedParamType
    }
}

impl fmt::Display for SynthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SynthError::Unsupported { type_str } => {
                write!(f, "no synthesis strategy for type {}", type_str)
            }
            SynthError::DepthExceeded { depth, type_str } => {
                write!(
                    f,
                    "recursion depth {} exceeded while synthesizing {}",
                    depth, type_str
                )
            }
        }
    }
}

impl std::error::Error for SynthError {}

// =============================================================================
// Plan Validation Errors
// =============================================================================

/// A call plan that could not have been produced by synthesis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlanError {
    /// A plan must end with the call under analysis.
    EmptyPlan,
    /// Call `call_index` reads result `result_index`, which is not an earlier call.
    ForwardReference {
        call_index: usize,
        result_index: usize,
    },
}

impl fmt::Display for PlanError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlanError::EmptyPlan => write!(f, "call plan has no calls"),
            PlanError::ForwardReference {
                call_index,
                result_index,
            } => write!(
                f,
                "call {} references result {} which is not produced by an earlier call",
                call_index, result_index
            ),
        }
    }
}

impl std::error::Error for PlanError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reason_codes_are_snake_case() {
        let all = [
            RejectionReason::NotPublicEntry,
            RejectionReason::HasTypeParams,
            RejectionReason::UnsupportedParamType,
            RejectionReason::NoCandidates,
            RejectionReason::InterfaceMissingOrInvalid,
            RejectionReason::MalformedFunction,
        ];
        for reason in all {
            let json = serde_json::to_value(reason).unwrap();
            assert_eq!(json, serde_json::Value::String(reason.as_str().to_string()));
            assert_eq!(reason.to_string(), reason.as_str());
        }
    }

    #[test]
    fn test_synth_errors_map_to_unsupported_param_type() {
        let depth = SynthError::DepthExceeded {
            depth: 4,
            type_str: "0xa::m::A".to_string(),
        };
        assert_eq!(depth.rejection_reason(), RejectionReason::UnsupportedParamType);
        assert_eq!(depth.type_str(), "0xa::m::A");
        assert!(depth.to_string().contains("depth 4"));

        let unsupported = SynthError::unsupported("signer");
        assert_eq!(unsupported.rejection_reason(), RejectionReason::UnsupportedParamType);
        assert!(unsupported.to_string().ends_with("signer"));
    }

    #[test]
    fn test_plan_error_display() {
        let err = PlanError::ForwardReference {
            call_index: 0,
            result_index: 1,
        };
        assert_eq!(
            err.to_string(),
            "call 0 references result 1 which is not produced by an earlier call"
        );
    }
}
