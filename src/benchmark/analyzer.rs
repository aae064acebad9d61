//! Function/Package Analyzer: run synthesis over a whole package.
//!
//! [`analyze_package`] builds the [`ConstructorIndex`] once, then analyzes every
//! function in lexical module/function order, so two runs over the same
//! document produce identical output. Broken functions become rejections; only
//! an unusable document short-circuits (see [`analyze_interface_value`]).
//!
//! [`compute_package_viability`] is the cheap triage pass: it counts callable
//! functions whose arguments are all literal defaults, without recursion.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use sui_package_interface::{FunctionSignature, PackageInterface};
use sui_synth_types::strip_trailing_context;
use tracing::{debug, warn};

use crate::benchmark::constructor_map::ConstructorIndex;
use crate::benchmark::errors::RejectionReason;
use crate::benchmark::ptb::{Call, CallPlan};
use crate::benchmark::synthesizer::{
    direct_default, ArgSynthesizer, Resolution, SynthesisConfig, TypeArgPolicy,
};
use crate::benchmark::well_known::WellKnown;

// =============================================================================
// Results
// =============================================================================

/// A parameter that only got a placeholder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnresolvedSlot {
    pub param_index: usize,
    pub type_str: String,
}

/// Outcome of synthesis for one function.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionAnalysis {
    pub target: String,
    pub module: String,
    pub function: String,
    pub is_runnable: bool,
    #[serde(default)]
    pub reasons: Vec<RejectionReason>,
    /// Present when runnable, and as a best-effort plan when the only gaps
    /// are placeholders.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plan: Option<CallPlan>,
    /// Concrete type arguments chosen for the function's generics.
    #[serde(default)]
    pub type_args: Vec<String>,
    #[serde(default)]
    pub has_type_params: bool,
    /// How each parameter was filled, in declaration order (context tail included).
    #[serde(default)]
    pub params: Vec<Resolution>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub unresolved: Vec<UnresolvedSlot>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl FunctionAnalysis {
    fn pending(sig: &FunctionSignature) -> Self {
        Self {
            target: sig.target(),
            module: sig.module.clone(),
            function: sig.name.clone(),
            is_runnable: false,
            reasons: Vec::new(),
            plan: None,
            type_args: Vec::new(),
            has_type_params: sig.has_type_params(),
            params: Vec::new(),
            unresolved: Vec::new(),
            detail: None,
        }
    }

    fn reject(mut self, reason: RejectionReason, detail: Option<String>) -> Self {
        self.is_runnable = false;
        self.reasons.push(reason);
        self.detail = detail;
        self
    }

    fn malformed(address: &str, module: &str, function: &str, detail: &str) -> Self {
        Self {
            target: format!("{}::{}::{}", address, module, function),
            module: module.to_string(),
            function: function.to_string(),
            is_runnable: false,
            reasons: vec![RejectionReason::MalformedFunction],
            plan: None,
            type_args: Vec::new(),
            has_type_params: false,
            params: Vec::new(),
            unresolved: Vec::new(),
            detail: Some(detail.to_string()),
        }
    }

    /// A plan exists, even if it still carries placeholders.
    pub fn has_plan(&self) -> bool {
        self.plan.is_some()
    }
}

/// A runnable plan for one function.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidatePlan {
    pub target: String,
    pub type_args: Vec<String>,
    pub plan: CallPlan,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RejectedCandidate {
    pub target: String,
    pub reasons: Vec<RejectionReason>,
}

/// Package-level results.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PackageAnalysis {
    #[serde(default)]
    pub package_id: Option<String>,
    /// Package-level reasons: `interface_missing_or_invalid` or `no_candidates`.
    #[serde(default)]
    pub reasons: Vec<RejectionReason>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub functions_total: usize,
    pub candidates_ok: Vec<CandidatePlan>,
    pub candidates_rejected: Vec<RejectedCandidate>,
    pub rejection_histogram: BTreeMap<RejectionReason, usize>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub invalid_modules: BTreeMap<String, String>,
    pub functions: Vec<FunctionAnalysis>,
}

impl PackageAnalysis {
    fn invalid_interface(error: String) -> Self {
        Self {
            reasons: vec![RejectionReason::InterfaceMissingOrInvalid],
            error: Some(error),
            ..Default::default()
        }
    }

    pub fn function(&self, target: &str) -> Option<&FunctionAnalysis> {
        self.functions.iter().find(|f| f.target == target)
    }

    pub fn runnable_count(&self) -> usize {
        self.candidates_ok.len()
    }
}

// =============================================================================
// Analysis
// =============================================================================

/// Analyze one function against a prebuilt index.
pub fn analyze_function(
    sig: &FunctionSignature,
    index: &ConstructorIndex,
    interface: &PackageInterface,
    config: &SynthesisConfig,
    policy: &dyn TypeArgPolicy,
) -> FunctionAnalysis {
    let mut analysis = FunctionAnalysis::pending(sig);

    if !sig.is_public() && !sig.is_entry {
        return analysis.reject(RejectionReason::NotPublicEntry, None);
    }

    let type_args = match policy.choose(sig, &config.well_known) {
        Some(args) if args.len() == sig.type_param_count => args,
        Some(args) => {
            let detail = format!(
                "policy {} returned {} type arguments for {} parameters",
                policy.name(),
                args.len(),
                sig.type_param_count
            );
            return analysis.reject(RejectionReason::HasTypeParams, Some(detail));
        }
        None => {
            let detail = format!("policy {} declined generic function", policy.name());
            return analysis.reject(RejectionReason::HasTypeParams, Some(detail));
        }
    };
    analysis.type_args = type_args.iter().map(ToString::to_string).collect();

    let params: Vec<_> = sig.params.iter().map(|p| p.substitute(&type_args)).collect();
    if let Some(unbound) = params.iter().find(|p| p.contains_type_params()) {
        let detail = format!("unbound type parameter in {}", unbound);
        return analysis.reject(RejectionReason::UnsupportedParamType, Some(detail));
    }
    let stripped = strip_trailing_context(&params, &config.well_known.context_type);
    let has_context_tail = stripped.len() < params.len();

    let synthesizer = ArgSynthesizer::new(index, interface, config);
    let mut plan = CallPlan::new();
    let mut args = Vec::with_capacity(stripped.len());

    for (param_index, param) in stripped.iter().enumerate() {
        match synthesizer.synthesize(param, plan.len()) {
            Ok(synthesis) => {
                if synthesis.is_placeholder() {
                    analysis.unresolved.push(UnresolvedSlot {
                        param_index,
                        type_str: param.to_string(),
                    });
                }
                analysis.params.push(synthesis.resolution);
                plan.calls.extend(synthesis.setup);
                args.push(synthesis.arg);
            }
            Err(e) => {
                analysis.params.clear();
                analysis.unresolved.clear();
                return analysis.reject(e.rejection_reason(), Some(e.to_string()));
            }
        }
    }
    if has_context_tail {
        analysis.params.push(Resolution::SystemValue);
    }

    plan.push(Call::new(sig.target(), analysis.type_args.clone(), args));
    analysis.plan = Some(plan);

    if analysis.unresolved.is_empty() {
        analysis.is_runnable = true;
        analysis
    } else {
        let detail = analysis
            .unresolved
            .iter()
            .map(|slot| format!("param {}: {}", slot.param_index, slot.type_str))
            .collect::<Vec<_>>()
            .join(", ");
        analysis.reject(
            RejectionReason::UnsupportedParamType,
            Some(format!("no constructor for {}", detail)),
        )
    }
}

/// Analyze every function of a decoded interface.
pub fn analyze_package(
    interface: &PackageInterface,
    config: &SynthesisConfig,
    policy: &dyn TypeArgPolicy,
) -> PackageAnalysis {
    let index = ConstructorIndex::build(interface);
    debug!(
        constructors = index.len(),
        produced_types = index.type_count(),
        "built constructor index"
    );

    let mut out = PackageAnalysis {
        package_id: interface.package_id.clone(),
        invalid_modules: interface.invalid_modules.clone(),
        ..Default::default()
    };
    for (module, reason) in &interface.invalid_modules {
        warn!(module = %module, reason = %reason, "skipping invalid module");
    }

    for (module_name, module) in &interface.modules {
        let address = module.address.as_deref().unwrap_or("0x0");
        let mut names: Vec<&String> = module
            .functions
            .keys()
            .chain(module.malformed_functions.keys())
            .collect();
        names.sort();

        for name in names {
            let analysis = match module.functions.get(name) {
                Some(sig) => analyze_function(sig, &index, interface, config, policy),
                None => {
                    let detail = module
                        .malformed_functions
                        .get(name)
                        .map(String::as_str)
                        .unwrap_or("undecodable declaration");
                    warn!(module = %module_name, function = %name, detail, "malformed function");
                    FunctionAnalysis::malformed(address, module_name, name, detail)
                }
            };
            out.record(analysis);
        }
    }

    if out.candidates_ok.is_empty() {
        out.reasons.push(RejectionReason::NoCandidates);
    }
    out
}

impl PackageAnalysis {
    fn record(&mut self, analysis: FunctionAnalysis) {
        self.functions_total += 1;
        debug!(
            function = %analysis.target,
            runnable = analysis.is_runnable,
            reasons = ?analysis.reasons,
            "analyzed function"
        );
        if analysis.is_runnable {
            if let Some(plan) = &analysis.plan {
                self.candidates_ok.push(CandidatePlan {
                    target: analysis.target.clone(),
                    type_args: analysis.type_args.clone(),
                    plan: plan.clone(),
                });
            }
        } else {
            for reason in &analysis.reasons {
                *self.rejection_histogram.entry(*reason).or_insert(0) += 1;
            }
            self.candidates_rejected.push(RejectedCandidate {
                target: analysis.target.clone(),
                reasons: analysis.reasons.clone(),
            });
        }
        self.functions.push(analysis);
    }
}

/// Decode and analyze a raw interface document.
///
/// A document without a `modules` map yields a single
/// `interface_missing_or_invalid` reason and no candidates.
pub fn analyze_interface_value(
    doc: &Value,
    config: &SynthesisConfig,
    policy: &dyn TypeArgPolicy,
) -> PackageAnalysis {
    match PackageInterface::from_value(doc) {
        Ok(interface) => analyze_package(&interface, config, policy),
        Err(e) => {
            warn!(error = %e, "interface document rejected");
            PackageAnalysis::invalid_interface(e.to_string())
        }
    }
}

// =============================================================================
// Viability
// =============================================================================

/// Cheap lower bound on achievability.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageViability {
    /// `public` and `entry`.
    pub public_entry: usize,
    /// ... and without type parameters.
    pub public_entry_no_type_params: usize,
    /// ... and every parameter (after the context tail) has a literal default.
    pub public_entry_default_only: usize,
}

pub fn compute_package_viability(
    interface: &PackageInterface,
    well_known: &WellKnown,
) -> PackageViability {
    let mut counts = PackageViability::default();
    for sig in interface.functions() {
        if !(sig.is_public() && sig.is_entry) {
            continue;
        }
        counts.public_entry += 1;
        if sig.has_type_params() {
            continue;
        }
        counts.public_entry_no_type_params += 1;
        let params = strip_trailing_context(&sig.params, &well_known.context_type);
        if params
            .iter()
            .all(|p| direct_default(p, well_known).is_some())
        {
            counts.public_entry_default_only += 1;
        }
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::benchmark::synthesizer::{NativeCoinTypeArgs, RejectGenerics};
    use serde_json::json;

    fn dt(name: &str) -> Value {
        json!({"kind": "datatype", "address": "0xa", "module": "m", "name": name, "type_args": []})
    }

    fn ctx(mutable: bool) -> Value {
        json!({"kind": "ref", "mutable": mutable, "to": {
            "kind": "datatype", "address": "0x2", "module": "tx_context", "name": "TxContext", "type_args": []
        }})
    }

    fn func(visibility: &str, is_entry: bool, type_params: usize, params: Vec<Value>) -> Value {
        json!({
            "visibility": visibility,
            "is_entry": is_entry,
            "type_params": vec![json!({}); type_params],
            "params": params,
            "returns": []
        })
    }

    fn doc() -> Value {
        json!({
            "package_id": "0xa",
            "modules": {
                "m": {
                    "address": "0xa",
                    "functions": {
                        "new_config": {"visibility": "public", "params": [ctx(true)], "returns": [dt("Config")]},
                        "basic": func("public", true, 0, vec![json!({"kind": "u64"}), json!({"kind": "bool"}), ctx(true)]),
                        "configure": func("public", false, 0, vec![dt("Config")]),
                        "needs_pool": func("public", true, 0, vec![json!({"kind": "u8"}), dt("Pool")]),
                        "internal": func("private", false, 0, vec![]),
                        "entry_only": func("private", true, 0, vec![]),
                        "generic": func("public", true, 1, vec![json!({"kind": "ref", "mutable": true, "to": {
                            "kind": "datatype", "address": "0x2", "module": "coin", "name": "Coin",
                            "type_args": [{"kind": "type_param", "index": 0}]
                        }})]),
                        "ctx_first": func("public", true, 0, vec![ctx(false), json!({"kind": "u64"})]),
                        "broken": {"visibility": "public", "params": "nope"}
                    }
                }
            }
        })
    }

    fn analyze(policy: &dyn TypeArgPolicy) -> PackageAnalysis {
        analyze_interface_value(&doc(), &SynthesisConfig::default(), policy)
    }

    #[test]
    fn test_default_only_function() {
        let out = analyze(&NativeCoinTypeArgs);
        let basic = out.function("0xa::m::basic").unwrap();
        assert!(basic.is_runnable);
        let plan = serde_json::to_value(basic.plan.as_ref().unwrap()).unwrap();
        assert_eq!(
            plan,
            json!({"calls": [{"target": "0xa::m::basic", "type_args": [], "args": [{"u64": 1}, {"bool": false}]}]})
        );
        let descriptors: Vec<String> = basic.params.iter().map(ToString::to_string).collect();
        assert_eq!(descriptors, vec!["primitive", "primitive", "system_value"]);
    }

    #[test]
    fn test_generic_filled_with_native_coin() {
        let out = analyze(&NativeCoinTypeArgs);
        let generic = out.function("0xa::m::generic").unwrap();
        assert!(generic.is_runnable);
        assert_eq!(generic.type_args, vec!["0x2::sui::SUI".to_string()]);
        let call = generic.plan.as_ref().unwrap().final_call().unwrap();
        assert_eq!(
            serde_json::to_value(&call.args).unwrap(),
            json!([{"sender_coin": {"coin_type": "0x2::sui::SUI", "mutable": true}}])
        );

        let out = analyze(&RejectGenerics);
        let generic = out.function("0xa::m::generic").unwrap();
        assert_eq!(generic.reasons, vec![RejectionReason::HasTypeParams]);
        assert!(generic.plan.is_none());
    }

    #[test]
    fn test_visibility_gate() {
        let out = analyze(&NativeCoinTypeArgs);
        assert_eq!(
            out.function("0xa::m::internal").unwrap().reasons,
            vec![RejectionReason::NotPublicEntry]
        );
        assert!(out.function("0xa::m::entry_only").unwrap().is_runnable);
    }

    #[test]
    fn test_context_outside_tail_is_rejected() {
        let out = analyze(&NativeCoinTypeArgs);
        let f = out.function("0xa::m::ctx_first").unwrap();
        assert_eq!(f.reasons, vec![RejectionReason::UnsupportedParamType]);
        assert!(f.plan.is_none());
    }

    #[test]
    fn test_placeholder_keeps_best_effort_plan() {
        let out = analyze(&NativeCoinTypeArgs);
        let f = out.function("0xa::m::needs_pool").unwrap();
        assert!(!f.is_runnable);
        assert_eq!(f.reasons, vec![RejectionReason::UnsupportedParamType]);
        assert_eq!(
            f.unresolved,
            vec![UnresolvedSlot {
                param_index: 1,
                type_str: "0xa::m::Pool".to_string()
            }]
        );
        let call = f.plan.as_ref().unwrap().final_call().unwrap();
        assert_eq!(call.args[1], crate::benchmark::ptb::PlanArg::unresolved("0xa::m::Pool"));
        assert!(out.candidates_ok.iter().all(|c| c.target != f.target));
    }

    #[test]
    fn test_package_histogram_and_partition() {
        let out = analyze(&NativeCoinTypeArgs);
        assert_eq!(out.functions_total, 9);
        // new_config, basic, configure, entry_only, generic
        assert_eq!(out.runnable_count(), 5);
        assert_eq!(out.rejection_histogram[&RejectionReason::UnsupportedParamType], 2);
        assert_eq!(out.rejection_histogram[&RejectionReason::NotPublicEntry], 1);
        assert_eq!(out.rejection_histogram[&RejectionReason::MalformedFunction], 1);
        assert!(out.reasons.is_empty());

        let targets: Vec<&str> = out.functions.iter().map(|f| f.function.as_str()).collect();
        let mut sorted = targets.clone();
        sorted.sort();
        assert_eq!(targets, sorted);
    }

    #[test]
    fn test_one_hop_plan_shape() {
        let out = analyze(&NativeCoinTypeArgs);
        let f = out.function("0xa::m::configure").unwrap();
        assert_eq!(
            serde_json::to_value(f.plan.as_ref().unwrap()).unwrap(),
            json!({"calls": [
                {"target": "0xa::m::new_config", "type_args": [], "args": []},
                {"target": "0xa::m::configure", "type_args": [], "args": [{"result": 0}]}
            ]})
        );
        assert_eq!(f.params, vec![Resolution::Constructor { hops: 1 }]);
    }

    #[test]
    fn test_out_of_range_type_param_is_rejected() {
        let doc = json!({"modules": {"m": {"address": "0xa", "functions": {
            "f": func("public", true, 1, vec![json!({"kind": "vector", "type": {"kind": "type_param", "index": 2}})])
        }}}});
        let out = analyze_interface_value(&doc, &SynthesisConfig::default(), &NativeCoinTypeArgs);
        let f = out.function("0xa::m::f").unwrap();
        assert_eq!(f.reasons, vec![RejectionReason::UnsupportedParamType]);
        assert_eq!(f.detail.as_deref(), Some("unbound type parameter in vector<T2>"));
    }

    #[test]
    fn test_invalid_interface_short_circuits() {
        let out = analyze_interface_value(
            &json!({"package_id": "0xa"}),
            &SynthesisConfig::default(),
            &NativeCoinTypeArgs,
        );
        assert_eq!(out.reasons, vec![RejectionReason::InterfaceMissingOrInvalid]);
        assert!(out.candidates_ok.is_empty());
        assert!(out.candidates_rejected.is_empty());
        assert_eq!(out.functions_total, 0);
    }

    #[test]
    fn test_empty_package_has_no_candidates() {
        let out = analyze_interface_value(
            &json!({"modules": {}}),
            &SynthesisConfig::default(),
            &NativeCoinTypeArgs,
        );
        assert_eq!(out.reasons, vec![RejectionReason::NoCandidates]);
    }

    #[test]
    fn test_viability_counts() {
        let iface = PackageInterface::from_value(&doc()).unwrap();
        let v = compute_package_viability(&iface, &WellKnown::default());
        // basic, needs_pool, generic, ctx_first
        assert_eq!(v.public_entry, 4);
        assert_eq!(v.public_entry_no_type_params, 3);
        // basic only: ctx_first keeps its context in the first slot
        assert_eq!(v.public_entry_default_only, 1);
    }
}
