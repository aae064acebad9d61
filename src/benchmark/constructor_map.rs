//! Constructor Index: which public functions produce which datatypes.
//!
//! For constructor chaining we need to know, for a type we cannot build
//! directly, which functions return exactly that type. The index is built in
//! one pass over the interface and is read-only afterwards.
//!
//! Keys are canonical type strings *including* type arguments, so
//! `Coin<0x2::sui::SUI>` and `Coin<u64>` are distinct entries. Candidate lists
//! keep module/function declaration order (modules and functions are visited
//! lexically), which is what makes synthesis deterministic.

use serde::Serialize;
use std::collections::BTreeMap;
use sui_package_interface::{FunctionSignature, PackageInterface};
use sui_synth_types::{AccountAddress, MoveType};
use tracing::trace;

/// A function known to return a given type as its sole return value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConstructorTarget {
    #[serde(skip)]
    pub address: AccountAddress,
    pub module: String,
    pub function: String,
    /// Generic constructors are indexed but never used during discovery.
    pub type_param_count: usize,
}

impl ConstructorTarget {
    fn from_signature(sig: &FunctionSignature) -> Self {
        Self {
            address: sig.address,
            module: sig.module.clone(),
            function: sig.name.clone(),
            type_param_count: sig.type_param_count,
        }
    }

    /// Fully-qualified `0xADDR::module::function`.
    pub fn target(&self) -> String {
        format!(
            "{}::{}::{}",
            self.address.to_hex_literal(),
            self.module,
            self.function
        )
    }
}

/// Map from produced type string to its constructors.
#[derive(Debug, Clone, Default)]
pub struct ConstructorIndex {
    constructors: BTreeMap<String, Vec<ConstructorTarget>>,
}

impl ConstructorIndex {
    /// Build the index from every module of an interface.
    ///
    /// A function qualifies when it is `public`, returns exactly one value, and
    /// that value is a datatype. The returned type does not have to be defined
    /// by the same module or package.
    pub fn build(interface: &PackageInterface) -> Self {
        let mut constructors: BTreeMap<String, Vec<ConstructorTarget>> = BTreeMap::new();

        for sig in interface.functions() {
            if !sig.is_public() {
                continue;
            }
            let [ret @ MoveType::Datatype(_)] = sig.returns.as_slice() else {
                continue;
            };
            let key = ret.to_string();
            trace!(function = %sig.target(), produces = %key, "indexed constructor");
            constructors
                .entry(key)
                .or_default()
                .push(ConstructorTarget::from_signature(sig));
        }

        ConstructorIndex { constructors }
    }

    /// Candidates for a canonical type string, in declaration order.
    pub fn constructors_for(&self, type_str: &str) -> &[ConstructorTarget] {
        self.constructors
            .get(type_str)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Number of distinct produced types.
    pub fn type_count(&self) -> usize {
        self.constructors.len()
    }

    /// Number of indexed constructor functions.
    pub fn len(&self) -> usize {
        self.constructors.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.constructors.is_empty()
    }
}
