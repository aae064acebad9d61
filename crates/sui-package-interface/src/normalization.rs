use anyhow::{anyhow, Result};
use serde_json::{Map, Value};
use sui_synth_types::address::parse_address;
use sui_synth_types::type_parsing::is_identifier;
use sui_synth_types::MoveType;

use crate::types::Visibility;

pub fn normalize_visibility(v: &Value) -> Option<Visibility> {
    match v.as_str()? {
        "public" | "Public" => Some(Visibility::Public),
        "friend" | "Friend" | "package" | "Package" => Some(Visibility::Friend),
        "private" | "Private" => Some(Visibility::Private),
        _ => None,
    }
}

/// Decode a type from either canonical (`{"kind": ...}`) or RPC-normalized JSON.
pub fn type_from_value(v: &Value) -> Result<MoveType> {
    if v.get("kind").is_some() {
        canonical_type_from_value(v)
    } else {
        rpc_type_to_move_type(v)
    }
}

/// Module or type name field; anything but a Move identifier would make two
/// different datatypes print the same canonical string.
fn identifier_field<'v>(
    obj: &'v Map<String, Value>,
    field: &str,
    v: &Value,
) -> Result<&'v str> {
    let s = obj
        .get(field)
        .and_then(Value::as_str)
        .ok_or_else(|| anyhow!("datatype missing {}: {}", field, v))?;
    if !is_identifier(s) {
        return Err(anyhow!("datatype {} is not an identifier: {:?}", field, s));
    }
    Ok(s)
}

pub fn canonical_type_from_value(v: &Value) -> Result<MoveType> {
    let obj = v
        .as_object()
        .ok_or_else(|| anyhow!("type is not an object: {}", v))?;
    let kind = obj
        .get("kind")
        .and_then(Value::as_str)
        .ok_or_else(|| anyhow!("type missing kind: {}", v))?;
    match kind {
        "datatype" => {
            let addr = obj
                .get("address")
                .and_then(Value::as_str)
                .ok_or_else(|| anyhow!("datatype missing address: {}", v))?;
            let module = identifier_field(obj, "module", v)?;
            let name = identifier_field(obj, "name", v)?;
            let args = match obj.get("type_args") {
                None | Some(Value::Null) => Vec::new(),
                Some(Value::Array(args)) => args
                    .iter()
                    .map(canonical_type_from_value)
                    .collect::<Result<_>>()?,
                Some(other) => return Err(anyhow!("datatype type_args is not an array: {}", other)),
            };
            let address =
                parse_address(addr).ok_or_else(|| anyhow!("invalid datatype address: {}", addr))?;
            Ok(MoveType::datatype(address, module, name, args))
        }
        "vector" => {
            let inner = obj
                .get("type")
                .ok_or_else(|| anyhow!("vector missing type: {}", v))?;
            Ok(MoveType::vector(canonical_type_from_value(inner)?))
        }
        "ref" => {
            let mutable = obj
                .get("mutable")
                .and_then(Value::as_bool)
                .ok_or_else(|| anyhow!("ref missing mutable bool: {}", v))?;
            let inner = obj
                .get("to")
                .ok_or_else(|| anyhow!("ref missing to: {}", v))?;
            Ok(MoveType::reference(mutable, canonical_type_from_value(inner)?))
        }
        "type_param" => {
            let idx = obj
                .get("index")
                .and_then(Value::as_u64)
                .ok_or_else(|| anyhow!("type_param missing numeric index: {}", v))?;
            let index =
                u16::try_from(idx).map_err(|_| anyhow!("type_param index too large: {}", idx))?;
            Ok(MoveType::TypeParam { index })
        }
        other => {
            primitive_from_name(other).ok_or_else(|| anyhow!("unknown type kind: {}", other))
        }
    }
}

fn primitive_from_name(name: &str) -> Option<MoveType> {
    Some(match name {
        "bool" | "Bool" => MoveType::Bool,
        "u8" | "U8" => MoveType::U8,
        "u16" | "U16" => MoveType::U16,
        "u32" | "U32" => MoveType::U32,
        "u64" | "U64" => MoveType::U64,
        "u128" | "U128" => MoveType::U128,
        "u256" | "U256" => MoveType::U256,
        "address" | "Address" => MoveType::Address,
        "signer" | "Signer" => MoveType::Signer,
        _ => return None,
    })
}

/// Decode the RPC `SuiMoveNormalizedType` shape (`"U64"`, `{"Vector": ..}`, `{"Struct": ..}`).
pub fn rpc_type_to_move_type(v: &Value) -> Result<MoveType> {
    if let Some(s) = v.as_str() {
        return primitive_from_name(s)
            .ok_or_else(|| anyhow!("unknown RPC primitive type string: {}", s));
    }

    let obj = v
        .as_object()
        .ok_or_else(|| anyhow!("RPC type is not an object: {}", v))?;
    let mut entries = obj.iter();
    let (k, inner) = match (entries.next(), entries.next()) {
        (Some(entry), None) => entry,
        _ => return Err(anyhow!("RPC type expected single-key object: {}", v)),
    };
    match k.as_str() {
        "Vector" => Ok(MoveType::vector(rpc_type_to_move_type(inner)?)),
        "Reference" => Ok(MoveType::reference(false, rpc_type_to_move_type(inner)?)),
        "MutableReference" => Ok(MoveType::reference(true, rpc_type_to_move_type(inner)?)),
        "TypeParameter" => {
            let idx = inner
                .as_u64()
                .ok_or_else(|| anyhow!("TypeParameter index is not u64: {}", inner))?;
            let index = u16::try_from(idx)
                .map_err(|_| anyhow!("TypeParameter index too large: {}", idx))?;
            Ok(MoveType::TypeParam { index })
        }
        "Struct" => {
            let s = inner
                .as_object()
                .ok_or_else(|| anyhow!("Struct payload is not object: {}", inner))?;
            let addr = s
                .get("address")
                .and_then(Value::as_str)
                .ok_or_else(|| anyhow!("Struct missing address: {}", inner))?;
            let module = identifier_field(s, "module", inner)?;
            let name = identifier_field(s, "name", inner)?;
            let args = s
                .get("typeArguments")
                .and_then(Value::as_array)
                .ok_or_else(|| anyhow!("Struct missing typeArguments: {}", inner))?;
            let args = args
                .iter()
                .map(rpc_type_to_move_type)
                .collect::<Result<Vec<_>>>()?;
            let address =
                parse_address(addr).ok_or_else(|| anyhow!("invalid Struct address: {}", addr))?;
            Ok(MoveType::datatype(address, module, name, args))
        }
        other => {
            primitive_from_name(other).ok_or_else(|| anyhow!("unknown RPC type tag: {}", other))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rpc_type_handles_string_primitives() {
        assert_eq!(
            rpc_type_to_move_type(&serde_json::json!("U64")).unwrap(),
            MoveType::U64
        );
        assert_eq!(
            rpc_type_to_move_type(&serde_json::json!("Address")).unwrap(),
            MoveType::Address
        );
    }

    #[test]
    fn test_rpc_type_handles_struct_reference() {
        let t = serde_json::json!({
            "MutableReference": {
                "Struct": {
                    "address": "0x2",
                    "module": "tx_context",
                    "name": "TxContext",
                    "typeArguments": []
                }
            }
        });
        let ty = rpc_type_to_move_type(&t).unwrap();
        assert_eq!(ty.to_string(), "&mut 0x2::tx_context::TxContext");
    }

    #[test]
    fn test_canonical_and_rpc_agree() {
        let canonical = serde_json::json!({
            "kind": "vector",
            "type": {
                "kind": "datatype",
                "address": "0x0000000000000000000000000000000000000000000000000000000000000002",
                "module": "coin",
                "name": "Coin",
                "type_args": [{"kind": "type_param", "index": 1}]
            }
        });
        let rpc = serde_json::json!({
            "Vector": {
                "Struct": {
                    "address": "0x2",
                    "module": "coin",
                    "name": "Coin",
                    "typeArguments": [{"TypeParameter": 1}]
                }
            }
        });
        assert_eq!(
            type_from_value(&canonical).unwrap(),
            type_from_value(&rpc).unwrap()
        );
    }

    #[test]
    fn test_malformed_types_are_errors() {
        assert!(type_from_value(&serde_json::json!({"kind": "ref", "to": {"kind": "u8"}})).is_err());
        assert!(type_from_value(&serde_json::json!({"kind": "widget"})).is_err());
        assert!(type_from_value(&serde_json::json!({"Vector": "U8", "Extra": 1})).is_err());
        assert!(type_from_value(&serde_json::json!(42)).is_err());
    }

    #[test]
    fn test_non_identifier_names_are_rejected() {
        let qualified_module = serde_json::json!({
            "kind": "datatype", "address": "0x1", "module": "a::b", "name": "C", "type_args": []
        });
        let qualified_name = serde_json::json!({
            "kind": "datatype", "address": "0x1", "module": "a", "name": "b::C", "type_args": []
        });
        let generic_name = serde_json::json!({
            "Struct": {"address": "0x1", "module": "a", "name": "C<u8>", "typeArguments": []}
        });
        for bad in [qualified_module, qualified_name, generic_name] {
            let err = type_from_value(&bad).unwrap_err();
            assert!(err.to_string().contains("not an identifier"), "{}", err);
        }

        let ok = serde_json::json!({
            "kind": "datatype", "address": "0x1", "module": "a_1", "name": "_C", "type_args": []
        });
        assert_eq!(type_from_value(&ok).unwrap().to_string(), "0x1::a_1::_C");
    }

    #[test]
    fn test_visibility_forms() {
        assert_eq!(
            normalize_visibility(&serde_json::json!("Public")),
            Some(Visibility::Public)
        );
        assert_eq!(
            normalize_visibility(&serde_json::json!("friend")),
            Some(Visibility::Friend)
        );
        assert_eq!(normalize_visibility(&serde_json::json!("open")), None);
    }
}
