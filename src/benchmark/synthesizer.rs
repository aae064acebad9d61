//! Argument Synthesizer: produce a call argument for a Move parameter type.
//!
//! For one parameter type the synthesizer returns the setup calls needed to
//! build a value plus the argument itself, or a [`SynthError`].
//!
//! ## Resolution order
//!
//! First success wins:
//!
//! 1. **Direct default**: `bool`, integers, `address`, and vectors of those.
//! 2. **Reference unwrap**: `&Clock`/`&Random`/`&DenyList` become shared-object
//!    selectors, `&Coin<SUI>` a sender-coin selector, anything else is resolved
//!    as the referenced type and passed as-is.
//! 3. **Standard recipes**: `String`, `ascii::String`, `Url`, `Option<T>`.
//! 4. **Constructor discovery** through the [`ConstructorIndex`].
//! 5. **Placeholder**: `{"unresolved": "<type>"}` for any other datatype.
//! 6. Everything else (`signer`, bare type parameters, vectors of
//!    non-primitives) is a hard failure.
//!
//! ## Result slots
//!
//! Every setup call occupies one result slot. The caller passes the next free
//! slot in and advances by `setup.len()` afterwards, so nested constructor
//! chains are numbered contiguously in execution order.
//!
//! ## Termination
//!
//! Each recursive step increments a depth counter. Crossing
//! [`SynthesisConfig::max_depth`] abandons the current constructor with
//! [`SynthError::DepthExceeded`]. Remaining candidates for the same type are
//! still tried; the error only surfaces when none of them succeeds, so a type
//! whose sole constructors form a cycle is a hard failure.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use sui_package_interface::{FunctionSignature, PackageInterface};
use sui_synth_types::env_utils::env_var_or;
use sui_synth_types::{strip_trailing_context, DatatypeTag, MoveType};
use tracing::trace;

use crate::benchmark::constructor_map::{ConstructorIndex, ConstructorTarget};
use crate::benchmark::errors::SynthError;
use crate::benchmark::ptb::{Call, PlanArg, PureValue, SenderCoin, SharedObjectRef};
use crate::benchmark::well_known::{Recipe, RecipeKind, WellKnown};

// =============================================================================
// Configuration
// =============================================================================

/// Default recursion bound for constructor chains.
pub const DEFAULT_MAX_DEPTH: usize = 3;

/// Environment variable overriding [`DEFAULT_MAX_DEPTH`].
pub const MAX_DEPTH_ENV: &str = "SUI_PTB_SYNTH_MAX_DEPTH";

/// Configuration for argument synthesis.
///
/// # Example
///
/// ```
/// use sui_ptb_synth::benchmark::synthesizer::SynthesisConfig;
///
/// let config = SynthesisConfig::default().with_max_depth(5);
/// assert_eq!(config.max_depth, 5);
/// ```
#[derive(Debug, Clone)]
pub struct SynthesisConfig {
    /// Deepest recursion step allowed; the top-level parameter is depth 0.
    pub max_depth: usize,
    pub well_known: WellKnown,
}

impl Default for SynthesisConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            well_known: WellKnown::default(),
        }
    }
}

impl SynthesisConfig {
    /// Defaults, with `SUI_PTB_SYNTH_MAX_DEPTH` applied when set and numeric.
    pub fn from_env() -> Self {
        Self::default().with_max_depth(env_var_or(MAX_DEPTH_ENV, DEFAULT_MAX_DEPTH))
    }

    /// Builder method: set the recursion bound.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Builder method: target a different chain convention table.
    pub fn with_well_known(mut self, well_known: WellKnown) -> Self {
        self.well_known = well_known;
        self
    }
}

// =============================================================================
// Type Argument Policy
// =============================================================================

/// Chooses concrete type arguments for a generic function under analysis.
///
/// Returning `None` rejects the function with `has_type_params`. Constructors
/// found during discovery are never instantiated through this policy.
pub trait TypeArgPolicy: Send + Sync {
    fn name(&self) -> &'static str;

    fn choose(&self, sig: &FunctionSignature, well_known: &WellKnown) -> Option<Vec<MoveType>>;
}

/// Fill every type parameter with the native coin type.
///
/// This maximizes coverage but produces false negatives whenever a function's
/// type parameters need something else (a phantom witness, a pool's coin pair).
#[derive(Debug, Clone, Copy, Default)]
pub struct NativeCoinTypeArgs;

impl TypeArgPolicy for NativeCoinTypeArgs {
    fn name(&self) -> &'static str {
        "native_coin"
    }

    fn choose(&self, sig: &FunctionSignature, well_known: &WellKnown) -> Option<Vec<MoveType>> {
        Some(vec![well_known.native_coin_type.clone(); sig.type_param_count])
    }
}

/// Refuse every generic function.
#[derive(Debug, Clone, Copy, Default)]
pub struct RejectGenerics;

impl TypeArgPolicy for RejectGenerics {
    fn name(&self) -> &'static str {
        "reject_generics"
    }

    fn choose(&self, sig: &FunctionSignature, _well_known: &WellKnown) -> Option<Vec<MoveType>> {
        if sig.has_type_params() {
            None
        } else {
            Some(Vec::new())
        }
    }
}

// =============================================================================
// Resolution Descriptors
// =============================================================================

/// How a parameter was filled.
///
/// Serialized as `primitive`, `system_value`, `object`, `constructor`, or
/// `constructor_chain:N` for a chain of `N` constructor hops.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resolution {
    /// Literal default or standard recipe.
    Primitive,
    /// Shared system object, sender coin, or the stripped context.
    SystemValue,
    /// Placeholder; a live object would be needed.
    Object,
    /// Built by `hops` nested constructor calls.
    Constructor { hops: usize },
}

impl Resolution {
    pub fn constructor_hops(&self) -> usize {
        match self {
            Resolution::Constructor { hops } => *hops,
            _ => 0,
        }
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Resolution::Primitive => f.write_str("primitive"),
            Resolution::SystemValue => f.write_str("system_value"),
            Resolution::Object => f.write_str("object"),
            Resolution::Constructor { hops: 1 } => f.write_str("constructor"),
            Resolution::Constructor { hops } => write!(f, "constructor_chain:{}", hops),
        }
    }
}

impl FromStr for Resolution {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "primitive" => Ok(Resolution::Primitive),
            "system_value" => Ok(Resolution::SystemValue),
            "object" => Ok(Resolution::Object),
            "constructor" => Ok(Resolution::Constructor { hops: 1 }),
            other => other
                .strip_prefix("constructor_chain:")
                .and_then(|n| n.parse::<usize>().ok())
                .filter(|hops| *hops > 0)
                .map(|hops| Resolution::Constructor { hops })
                .ok_or_else(|| format!("unknown parameter descriptor: {}", other)),
        }
    }
}

impl Serialize for Resolution {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        s.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Resolution {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(d)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

// =============================================================================
// Synthesis
// =============================================================================

/// The value for one parameter plus the calls that must run first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Synthesis {
    /// Setup calls in execution order; each consumes one result slot.
    pub setup: Vec<Call>,
    pub arg: PlanArg,
    pub resolution: Resolution,
}

impl Synthesis {
    fn value(arg: PlanArg, resolution: Resolution) -> Self {
        Self {
            setup: Vec::new(),
            arg,
            resolution,
        }
    }

    pub fn is_placeholder(&self) -> bool {
        self.arg.is_unresolved()
    }
}

/// Literal default for primitives and vectors of primitives.
pub fn direct_default(ty: &MoveType, well_known: &WellKnown) -> Option<PureValue> {
    let address = || well_known.dummy_address.to_canonical_string(true);
    Some(match ty {
        MoveType::Bool => PureValue::Bool(false),
        MoveType::U8 => PureValue::U8(1),
        MoveType::U16 => PureValue::U16(1),
        MoveType::U32 => PureValue::U32(1),
        MoveType::U64 => PureValue::U64(1),
        MoveType::U128 => PureValue::U128("1".to_string()),
        MoveType::U256 => PureValue::U256("1".to_string()),
        MoveType::Address => PureValue::Address(address()),
        MoveType::Vector { inner } => match inner.as_ref() {
            MoveType::U8 => PureValue::bytes(&well_known.default_bytes),
            MoveType::Bool => PureValue::VectorBool(vec![false]),
            MoveType::U16 => PureValue::VectorU16(vec![1]),
            MoveType::U32 => PureValue::VectorU32(vec![1]),
            MoveType::U64 => PureValue::VectorU64(vec![1]),
            MoveType::U128 => PureValue::VectorU128(vec!["1".to_string()]),
            MoveType::U256 => PureValue::VectorU256(vec!["1".to_string()]),
            MoveType::Address => PureValue::VectorAddress(vec![address()]),
            _ => return None,
        },
        _ => return None,
    })
}

/// Recursive argument search over one package.
///
/// Borrowing everything keeps the synthesizer free of state: the same inputs
/// always produce the same [`Synthesis`].
pub struct ArgSynthesizer<'a> {
    index: &'a ConstructorIndex,
    interface: &'a PackageInterface,
    config: &'a SynthesisConfig,
}

impl<'a> ArgSynthesizer<'a> {
    pub fn new(
        index: &'a ConstructorIndex,
        interface: &'a PackageInterface,
        config: &'a SynthesisConfig,
    ) -> Self {
        Self {
            index,
            interface,
            config,
        }
    }

    /// Synthesize a value for `ty`, numbering new setup calls from `next_slot`.
    pub fn synthesize(&self, ty: &MoveType, next_slot: usize) -> Result<Synthesis, SynthError> {
        self.resolve(ty, next_slot, 0)
    }

    fn well_known(&self) -> &WellKnown {
        &self.config.well_known
    }

    fn resolve(
        &self,
        ty: &MoveType,
        next_slot: usize,
        depth: usize,
    ) -> Result<Synthesis, SynthError> {
        if depth > self.config.max_depth {
            return Err(SynthError::DepthExceeded {
                depth,
                type_str: ty.to_string(),
            });
        }
        trace!(ty = %ty, next_slot, depth, "resolving parameter");

        if let Some(value) = direct_default(ty, self.well_known()) {
            return Ok(Synthesis::value(value.into(), Resolution::Primitive));
        }

        match ty {
            MoveType::Reference { mutable, to } => {
                self.resolve_reference(ty, *mutable, to, next_slot, depth)
            }
            MoveType::Datatype(tag) => self.resolve_datatype(ty, tag, next_slot, depth),
            _ => Err(SynthError::unsupported(ty.to_string())),
        }
    }

    fn resolve_reference(
        &self,
        ty: &MoveType,
        mutable: bool,
        to: &MoveType,
        next_slot: usize,
        depth: usize,
    ) -> Result<Synthesis, SynthError> {
        let wk = self.well_known();

        if let Some(object) = wk.shared_object(to) {
            let arg = PlanArg::SharedObject {
                shared_object: SharedObjectRef {
                    name: object.name.clone(),
                    id: object.object_id.to_hex_literal(),
                    mutable,
                },
            };
            return Ok(Synthesis::value(arg, Resolution::SystemValue));
        }

        if wk.is_native_coin(to) {
            let arg = PlanArg::SenderCoin {
                sender_coin: SenderCoin {
                    coin_type: wk.native_coin_type.to_string(),
                    mutable,
                },
            };
            return Ok(Synthesis::value(arg, Resolution::SystemValue));
        }

        // Only the trailing slot is supplied by the runtime.
        if wk.is_context(to) {
            return Err(SynthError::unsupported(ty.to_string()));
        }

        self.resolve(to, next_slot, depth + 1)
    }

    fn resolve_datatype(
        &self,
        ty: &MoveType,
        tag: &DatatypeTag,
        next_slot: usize,
        depth: usize,
    ) -> Result<Synthesis, SynthError> {
        if self.well_known().is_context(ty) {
            return Err(SynthError::unsupported(ty.to_string()));
        }

        if let Some(recipe) = self.well_known().recipe_for(tag) {
            return Ok(self.apply_recipe(recipe, tag, next_slot));
        }

        if let Some(found) = self.discover(ty, next_slot, depth)? {
            return Ok(found);
        }

        trace!(ty = %ty, "no constructor; emitting placeholder");
        Ok(Synthesis::value(
            PlanArg::unresolved(ty.to_string()),
            Resolution::Object,
        ))
    }

    fn apply_recipe(&self, recipe: &Recipe, tag: &DatatypeTag, next_slot: usize) -> Synthesis {
        let wk = self.well_known();
        let (type_args, args) = match recipe.kind {
            RecipeKind::StringFromBytes => (
                Vec::new(),
                vec![PureValue::bytes(wk.placeholder_string.as_bytes()).into()],
            ),
            RecipeKind::UrlFromBytes => (
                Vec::new(),
                vec![PureValue::bytes(wk.placeholder_url.as_bytes()).into()],
            ),
            RecipeKind::OptionNone => {
                let inner = tag
                    .type_args
                    .first()
                    .map(|t| wk.concretize(t))
                    .unwrap_or_else(|| wk.native_coin_type.clone());
                (vec![inner.to_string()], Vec::new())
            }
        };
        trace!(call = %recipe.target(), slot = next_slot, "applied standard recipe");
        Synthesis {
            setup: vec![Call::new(recipe.target(), type_args, args)],
            arg: PlanArg::result(next_slot),
            resolution: Resolution::Primitive,
        }
    }

    /// Try indexed constructors in order; the first success wins.
    ///
    /// `Ok(None)` means none worked. A depth overflow from one candidate is
    /// held back until every later candidate has also failed.
    fn discover(
        &self,
        ty: &MoveType,
        next_slot: usize,
        depth: usize,
    ) -> Result<Option<Synthesis>, SynthError> {
        let type_str = ty.to_string();
        let mut overflow = None;
        for candidate in self.index.constructors_for(&type_str) {
            if candidate.type_param_count > 0 {
                trace!(candidate = %candidate.target(), "skipping generic constructor");
                continue;
            }
            let Some(sig) = self.lookup(candidate) else {
                trace!(candidate = %candidate.target(), "constructor not in interface");
                continue;
            };
            match self.try_constructor(sig, next_slot, depth) {
                Ok(Some(found)) => return Ok(Some(found)),
                Ok(None) => {}
                Err(e @ SynthError::DepthExceeded { .. }) => {
                    trace!(candidate = %candidate.target(), "constructor exceeded depth");
                    if overflow.is_none() {
                        overflow = Some(e);
                    }
                }
                Err(e) => return Err(e),
            }
        }
        match overflow {
            Some(e) => Err(e),
            None => Ok(None),
        }
    }

    fn lookup(&self, candidate: &ConstructorTarget) -> Option<&'a FunctionSignature> {
        self.interface
            .function(&candidate.module, &candidate.function)
            .filter(|sig| sig.address == candidate.address && !sig.has_type_params())
    }

    fn try_constructor(
        &self,
        sig: &FunctionSignature,
        next_slot: usize,
        depth: usize,
    ) -> Result<Option<Synthesis>, SynthError> {
        let params = strip_trailing_context(&sig.params, &self.well_known().context_type);
        let mut setup = Vec::new();
        let mut args = Vec::with_capacity(params.len());
        let mut hops = 0;

        for param in params {
            let slot = next_slot + setup.len();
            let resolved = match self.resolve(param, slot, depth + 1) {
                Ok(s) if !s.is_placeholder() => s,
                Err(e @ SynthError::DepthExceeded { .. }) => return Err(e),
                _ => {
                    trace!(
                        constructor = %sig.target(),
                        param = %param,
                        "constructor parameter unresolved"
                    );
                    return Ok(None);
                }
            };
            hops = hops.max(resolved.resolution.constructor_hops());
            setup.extend(resolved.setup);
            args.push(resolved.arg);
        }

        let slot = next_slot + setup.len();
        setup.push(Call::new(sig.target(), Vec::new(), args));
        Ok(Some(Synthesis {
            setup,
            arg: PlanArg::result(slot),
            resolution: Resolution::Constructor { hops: hops + 1 },
        }))
    }
}
