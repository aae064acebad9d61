//! JSON builders for interface documents.
//!
//! Every fixture is written in the canonical type JSON the extractor emits,
//! so tests exercise the same decoding path as real inputs.

use serde_json::{json, Value};

/// Address used for every fixture module.
pub const PKG: &str = "0xa";

/// `{"kind": "datatype"}` in the fixture package.
pub fn datatype(module: &str, name: &str) -> Value {
    json!({"kind": "datatype", "address": PKG, "module": module, "name": name, "type_args": []})
}

/// `&mut TxContext` (or `&TxContext`).
pub fn ctx(mutable: bool) -> Value {
    json!({"kind": "ref", "mutable": mutable, "to": {
        "kind": "datatype", "address": "0x2", "module": "tx_context", "name": "TxContext", "type_args": []
    }})
}

/// Reference to a framework type in `0x2`.
pub fn shared_ref(mutable: bool, module: &str, name: &str) -> Value {
    json!({"kind": "ref", "mutable": mutable, "to": {
        "kind": "datatype", "address": "0x2", "module": module, "name": name, "type_args": []
    }})
}

/// A function declaration.
pub fn function(
    visibility: &str,
    is_entry: bool,
    params: Vec<Value>,
    returns: Vec<Value>,
) -> Value {
    json!({
        "visibility": visibility,
        "is_entry": is_entry,
        "type_params": [],
        "params": params,
        "returns": returns
    })
}

/// Public non-entry function returning a single value.
pub fn ctor(params: Vec<Value>, ret: Value) -> Value {
    function("public", false, params, vec![ret])
}

/// Public entry function with no return values.
pub fn entry(params: Vec<Value>) -> Value {
    function("public", true, params, vec![])
}

/// A module at [`PKG`] with the given functions.
pub fn module(functions: Vec<(&str, Value)>) -> Value {
    let functions: serde_json::Map<String, Value> = functions
        .into_iter()
        .map(|(name, f)| (name.to_string(), f))
        .collect();
    json!({"address": PKG, "structs": {}, "functions": functions})
}

/// A package document with the given modules.
pub fn interface(modules: Vec<(&str, Value)>) -> Value {
    let modules: serde_json::Map<String, Value> = modules
        .into_iter()
        .map(|(name, m)| (name.to_string(), m))
        .collect();
    json!({"schema_version": 1, "package_id": PKG, "modules": modules})
}
