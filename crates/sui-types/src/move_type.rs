//! Canonical Move type model.
//!
//! [`MoveType`] mirrors the canonical type JSON emitted by the interface
//! extractor (`{"kind": "datatype", ...}`) and renders to the canonical string
//! used as the constructor-index key, e.g. `0x2::coin::Coin<0x2::sui::SUI>`.
//! [`crate::type_parsing::parse_move_type`] inverts [`fmt::Display`] exactly.

use crate::address::{address_to_short_string, serde_full};
use crate::framework::{SUI_FRAMEWORK, TX_CONTEXT_MODULE, TX_CONTEXT_TYPE};
use move_core_types::account_address::AccountAddress;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A function parameter or return type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MoveType {
    Bool,
    U8,
    U16,
    U32,
    U64,
    U128,
    U256,
    Address,
    Signer,
    Vector {
        #[serde(rename = "type")]
        inner: Box<MoveType>,
    },
    #[serde(rename = "ref")]
    Reference { mutable: bool, to: Box<MoveType> },
    Datatype(DatatypeTag),
    /// Index into the enclosing function's type parameter list.
    TypeParam { index: u16 },
}

/// A struct or enum instantiation: `address::module::name<type_args>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DatatypeTag {
    #[serde(with = "serde_full")]
    pub address: AccountAddress,
    pub module: String,
    pub name: String,
    #[serde(default)]
    pub type_args: Vec<MoveType>,
}

/// A datatype identity without type arguments, e.g. `0x2::clock::Clock`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TypeName {
    #[serde(with = "serde_full")]
    pub address: AccountAddress,
    pub module: String,
    pub name: String,
}

impl TypeName {
    pub fn new(
        address: AccountAddress,
        module: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            address,
            module: module.into(),
            name: name.into(),
        }
    }

    /// True if `tag` is an instantiation of this datatype (type arguments ignored).
    pub fn matches(&self, tag: &DatatypeTag) -> bool {
        tag.address == self.address && tag.module == self.module && tag.name == self.name
    }

    /// True if `ty` is `&Self` or `&mut Self`.
    pub fn is_referenced_by(&self, ty: &MoveType) -> bool {
        match ty {
            MoveType::Reference { to, .. } => to.datatype_tag().is_some_and(|d| self.matches(d)),
            _ => false,
        }
    }

    /// The type with the given arguments applied.
    pub fn instantiate(&self, type_args: Vec<MoveType>) -> MoveType {
        MoveType::Datatype(DatatypeTag {
            address: self.address,
            module: self.module.clone(),
            name: self.name.clone(),
            type_args,
        })
    }
}

impl fmt::Display for TypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}::{}::{}",
            address_to_short_string(&self.address),
            self.module,
            self.name
        )
    }
}

impl MoveType {
    pub fn vector(inner: MoveType) -> Self {
        MoveType::Vector {
            inner: Box::new(inner),
        }
    }

    pub fn reference(mutable: bool, to: MoveType) -> Self {
        MoveType::Reference {
            mutable,
            to: Box::new(to),
        }
    }

    pub fn datatype(
        address: AccountAddress,
        module: impl Into<String>,
        name: impl Into<String>,
        type_args: Vec<MoveType>,
    ) -> Self {
        MoveType::Datatype(DatatypeTag {
            address,
            module: module.into(),
            name: name.into(),
            type_args,
        })
    }

    pub fn datatype_tag(&self) -> Option<&DatatypeTag> {
        match self {
            MoveType::Datatype(tag) => Some(tag),
            _ => None,
        }
    }

    /// True if any `T<i>` occurs anywhere inside the type.
    pub fn contains_type_params(&self) -> bool {
        match self {
            MoveType::TypeParam { .. } => true,
            MoveType::Vector { inner } => inner.contains_type_params(),
            MoveType::Reference { to, .. } => to.contains_type_params(),
            MoveType::Datatype(tag) => tag.type_args.iter().any(MoveType::contains_type_params),
            _ => false,
        }
    }

    /// Replace `T<i>` with `type_args[i]`. Out-of-range indices are left in place.
    pub fn substitute(&self, type_args: &[MoveType]) -> MoveType {
        match self {
            MoveType::TypeParam { index } => type_args
                .get(*index as usize)
                .cloned()
                .unwrap_or_else(|| self.clone()),
            MoveType::Vector { inner } => MoveType::vector(inner.substitute(type_args)),
            MoveType::Reference { mutable, to } => {
                MoveType::reference(*mutable, to.substitute(type_args))
            }
            MoveType::Datatype(tag) => MoveType::Datatype(DatatypeTag {
                address: tag.address,
                module: tag.module.clone(),
                name: tag.name.clone(),
                type_args: tag.type_args.iter().map(|t| t.substitute(type_args)).collect(),
            }),
            _ => self.clone(),
        }
    }
}

impl fmt::Display for MoveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoveType::Bool => f.write_str("bool"),
            MoveType::U8 => f.write_str("u8"),
            MoveType::U16 => f.write_str("u16"),
            MoveType::U32 => f.write_str("u32"),
            MoveType::U64 => f.write_str("u64"),
            MoveType::U128 => f.write_str("u128"),
            MoveType::U256 => f.write_str("u256"),
            MoveType::Address => f.write_str("address"),
            MoveType::Signer => f.write_str("signer"),
            MoveType::Vector { inner } => write!(f, "vector<{}>", inner),
            MoveType::Reference { mutable: true, to } => write!(f, "&mut {}", to),
            MoveType::Reference { mutable: false, to } => write!(f, "&{}", to),
            MoveType::Datatype(tag) => write!(f, "{}", tag),
            MoveType::TypeParam { index } => write!(f, "T{}", index),
        }
    }
}

impl fmt::Display for DatatypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}::{}::{}",
            address_to_short_string(&self.address),
            self.module,
            self.name
        )?;
        if !self.type_args.is_empty() {
            let args: Vec<String> = self.type_args.iter().map(ToString::to_string).collect();
            write!(f, "<{}>", args.join(", "))?;
        }
        Ok(())
    }
}

// =============================================================================
// Transaction context tail
// =============================================================================

/// The framework's `0x2::tx_context::TxContext`.
pub fn tx_context_type_name() -> TypeName {
    TypeName::new(SUI_FRAMEWORK, TX_CONTEXT_MODULE, TX_CONTEXT_TYPE)
}

/// True if the last parameter is `&TxContext` or `&mut TxContext`.
///
/// Only the final slot counts; a context reference anywhere else is an ordinary
/// parameter and must go through synthesis.
pub fn is_mutable_tx_context_tail(params: &[MoveType]) -> bool {
    params
        .last()
        .is_some_and(|p| tx_context_type_name().is_referenced_by(p))
}

/// Drop a trailing context parameter, if present.
pub fn strip_trailing_tx_context(params: &[MoveType]) -> &[MoveType] {
    strip_trailing_context(params, &tx_context_type_name())
}

/// Drop a trailing reference to `context` (a configurable context type).
pub fn strip_trailing_context<'a>(params: &'a [MoveType], context: &TypeName) -> &'a [MoveType] {
    match params.split_last() {
        Some((last, rest)) if context.is_referenced_by(last) => rest,
        _ => params,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::framework::MOVE_STDLIB;

    fn coin_of(inner: MoveType) -> MoveType {
        MoveType::datatype(SUI_FRAMEWORK, "coin", "Coin", vec![inner])
    }

    fn sui() -> MoveType {
        MoveType::datatype(SUI_FRAMEWORK, "sui", "SUI", vec![])
    }

    fn tx_ctx(mutable: bool) -> MoveType {
        MoveType::reference(mutable, tx_context_type_name().instantiate(vec![]))
    }

    #[test]
    fn test_display_nested_generics() {
        let ty = MoveType::vector(coin_of(sui()));
        assert_eq!(ty.to_string(), "vector<0x2::coin::Coin<0x2::sui::SUI>>");

        let table = MoveType::datatype(SUI_FRAMEWORK, "table", "Table", vec![MoveType::U64, sui()]);
        assert_eq!(table.to_string(), "0x2::table::Table<u64, 0x2::sui::SUI>");
    }

    #[test]
    fn test_display_references_and_params() {
        assert_eq!(MoveType::reference(true, MoveType::U8).to_string(), "&mut u8");
        assert_eq!(MoveType::reference(false, sui()).to_string(), "&0x2::sui::SUI");
        assert_eq!(MoveType::TypeParam { index: 2 }.to_string(), "T2");
    }

    #[test]
    fn test_distinct_datatypes_never_collide() {
        let a = MoveType::datatype(SUI_FRAMEWORK, "string", "String", vec![]);
        let b = MoveType::datatype(MOVE_STDLIB, "string", "String", vec![]);
        let c = MoveType::datatype(MOVE_STDLIB, "ascii", "String", vec![]);
        assert_ne!(a.to_string(), b.to_string());
        assert_ne!(b.to_string(), c.to_string());
        assert_ne!(coin_of(sui()).to_string(), coin_of(MoveType::U64).to_string());
    }

    #[test]
    fn test_deserialize_canonical_json() {
        let json = serde_json::json!({
            "kind": "ref",
            "mutable": true,
            "to": {
                "kind": "datatype",
                "address": "0x0000000000000000000000000000000000000000000000000000000000000002",
                "module": "coin",
                "name": "Coin",
                "type_args": [{"kind": "type_param", "index": 0}]
            }
        });
        let ty: MoveType = serde_json::from_value(json).unwrap();
        assert_eq!(ty.to_string(), "&mut 0x2::coin::Coin<T0>");
        assert!(ty.contains_type_params());

        let back = serde_json::to_value(&ty).unwrap();
        assert_eq!(back["to"]["address"].as_str().unwrap().len(), 66);
        assert_eq!(back["to"]["type_args"][0]["kind"], "type_param");
    }

    #[test]
    fn test_substitute() {
        let ty = MoveType::reference(true, coin_of(MoveType::TypeParam { index: 0 }));
        let concrete = ty.substitute(&[sui()]);
        assert_eq!(concrete.to_string(), "&mut 0x2::coin::Coin<0x2::sui::SUI>");
        assert!(!concrete.contains_type_params());

        // Out of range stays generic
        let ty = MoveType::TypeParam { index: 3 };
        assert_eq!(ty.substitute(&[sui()]), ty);
    }

    #[test]
    fn test_strip_trailing_tx_context() {
        let params = vec![MoveType::U64, tx_ctx(true)];
        assert!(is_mutable_tx_context_tail(&params));
        assert_eq!(strip_trailing_tx_context(&params), &[MoveType::U64]);

        let immutable = vec![tx_ctx(false)];
        assert!(strip_trailing_tx_context(&immutable).is_empty());
    }

    #[test]
    fn test_context_in_other_slot_is_kept() {
        let params = vec![tx_ctx(true), MoveType::U64];
        assert!(!is_mutable_tx_context_tail(&params));
        assert_eq!(strip_trailing_tx_context(&params).len(), 2);

        // By-value context is not the conventional tail
        let by_value = vec![tx_context_type_name().instantiate(vec![])];
        assert_eq!(strip_trailing_tx_context(&by_value).len(), 1);
        assert!(strip_trailing_tx_context(&[]).is_empty());
    }
}
