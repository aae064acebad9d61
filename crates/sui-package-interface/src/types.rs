use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use sui_synth_types::address::address_to_short_string;
use sui_synth_types::{AccountAddress, MoveType};

use crate::normalization::{normalize_visibility, type_from_value};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Visibility {
    Public,
    Friend,
    Private,
}

/// One function declaration, parsed once per pass and immutable afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionSignature {
    #[serde(with = "sui_synth_types::address::serde_full")]
    pub address: AccountAddress,
    pub module: String,
    pub name: String,
    pub visibility: Visibility,
    pub is_entry: bool,
    /// Only the count matters; ability constraints are not tracked.
    pub type_param_count: usize,
    pub params: Vec<MoveType>,
    pub returns: Vec<MoveType>,
}

impl FunctionSignature {
    /// Fully-qualified call target, `0xADDR::module::function`.
    pub fn target(&self) -> String {
        format!(
            "{}::{}::{}",
            address_to_short_string(&self.address),
            self.module,
            self.name
        )
    }

    pub fn is_public(&self) -> bool {
        self.visibility == Visibility::Public
    }

    pub fn has_type_params(&self) -> bool {
        self.type_param_count > 0
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ModuleInterface {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    pub struct_names: Vec<String>,
    pub functions: BTreeMap<String, FunctionSignature>,
    /// Functions whose declaration could not be decoded: name -> reason.
    pub malformed_functions: BTreeMap<String, String>,
}

/// A decoded interface document.
///
/// Modules and functions are kept in `BTreeMap`s so every iteration over the
/// package is lexically ordered.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PackageInterface {
    pub package_id: Option<String>,
    pub modules: BTreeMap<String, ModuleInterface>,
    /// Module entries that were not objects or had no usable address: name -> reason.
    pub invalid_modules: BTreeMap<String, String>,
}

/// The document is structurally unusable; nothing in it can be analyzed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InterfaceError {
    NotAnObject,
    MissingModules,
}

impl fmt::Display for InterfaceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InterfaceError::NotAnObject => write!(f, "interface document is not a JSON object"),
            InterfaceError::MissingModules => {
                write!(f, "interface document has no `modules` object")
            }
        }
    }
}

impl std::error::Error for InterfaceError {}

impl PackageInterface {
    /// Decode an interface document.
    ///
    /// Only a missing `modules` map is fatal. Broken modules and functions are
    /// kept aside (`invalid_modules`, `malformed_functions`) so callers can
    /// report them per item.
    pub fn from_value(doc: &Value) -> Result<Self, InterfaceError> {
        let obj = doc.as_object().ok_or(InterfaceError::NotAnObject)?;
        let modules_obj = obj
            .get("modules")
            .and_then(Value::as_object)
            .ok_or(InterfaceError::MissingModules)?;

        let mut out = PackageInterface {
            package_id: obj
                .get("package_id")
                .and_then(Value::as_str)
                .map(str::to_string),
            ..Default::default()
        };

        for (module_name, module_value) in modules_obj {
            match decode_module(module_name, module_value) {
                Ok(module) => {
                    out.modules.insert(module_name.clone(), module);
                }
                Err(reason) => {
                    out.invalid_modules.insert(module_name.clone(), reason);
                }
            }
        }
        Ok(out)
    }

    pub fn function(&self, module: &str, name: &str) -> Option<&FunctionSignature> {
        self.modules.get(module)?.functions.get(name)
    }

    /// All decoded functions, module by module, each in lexical order.
    pub fn functions(&self) -> impl Iterator<Item = &FunctionSignature> {
        self.modules.values().flat_map(|m| m.functions.values())
    }

    pub fn function_count(&self) -> usize {
        self.modules.values().map(|m| m.functions.len()).sum()
    }
}

fn decode_module(module_name: &str, value: &Value) -> Result<ModuleInterface, String> {
    let obj = value
        .as_object()
        .ok_or_else(|| "module entry is not an object".to_string())?;
    let address_str = obj
        .get("address")
        .and_then(Value::as_str)
        .ok_or_else(|| "module missing address".to_string())?;
    let address = sui_synth_types::address::parse_address(address_str)
        .ok_or_else(|| format!("invalid module address: {}", address_str))?;

    let mut module = ModuleInterface {
        name: module_name.to_string(),
        address: Some(address_to_short_string(&address)),
        ..Default::default()
    };

    if let Some(structs) = obj.get("structs").and_then(Value::as_object) {
        module.struct_names = structs.keys().cloned().collect();
    }

    let Some(functions) = obj.get("functions") else {
        return Ok(module);
    };
    let functions = functions
        .as_object()
        .ok_or_else(|| "module functions is not an object".to_string())?;
    for (fn_name, fn_value) in functions {
        match decode_function(address, module_name, fn_name, fn_value) {
            Ok(sig) => {
                module.functions.insert(fn_name.clone(), sig);
            }
            Err(e) => {
                module.malformed_functions.insert(fn_name.clone(), e.to_string());
            }
        }
    }
    Ok(module)
}

fn decode_function(
    address: AccountAddress,
    module: &str,
    name: &str,
    value: &Value,
) -> anyhow::Result<FunctionSignature> {
    let obj = value
        .as_object()
        .ok_or_else(|| anyhow::anyhow!("function entry is not an object"))?;
    let visibility = obj
        .get("visibility")
        .and_then(normalize_visibility)
        .ok_or_else(|| anyhow::anyhow!("missing or unknown visibility"))?;
    let is_entry = obj.get("is_entry").and_then(Value::as_bool).unwrap_or(false);
    let type_param_count = match obj.get("type_params") {
        None | Some(Value::Null) => 0,
        Some(Value::Array(tps)) => tps.len(),
        Some(Value::Number(n)) => n
            .as_u64()
            .and_then(|n| usize::try_from(n).ok())
            .ok_or_else(|| anyhow::anyhow!("invalid type_params count"))?,
        Some(_) => anyhow::bail!("type_params is neither a list nor a count"),
    };
    let params = decode_type_list(obj.get("params"), "params")?;
    let returns = decode_type_list(obj.get("returns"), "returns")?;

    Ok(FunctionSignature {
        address,
        module: module.to_string(),
        name: name.to_string(),
        visibility,
        is_entry,
        type_param_count,
        params,
        returns,
    })
}

fn decode_type_list(value: Option<&Value>, field: &str) -> anyhow::Result<Vec<MoveType>> {
    match value {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::Array(items)) => items
            .iter()
            .enumerate()
            .map(|(i, v)| {
                type_from_value(v).map_err(|e| anyhow::anyhow!("{}[{}]: {}", field, i, e))
            })
            .collect(),
        Some(_) => anyhow::bail!("{} is not an array", field),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const ADDR: &str = "0x00000000000000000000000000000000000000000000000000000000000000ab";

    fn sample_doc() -> Value {
        json!({
            "schema_version": 1,
            "package_id": ADDR,
            "modules": {
                "zeta": {
                    "address": ADDR,
                    "structs": {"Thing": {}},
                    "functions": {
                        "make": {
                            "visibility": "public",
                            "is_entry": false,
                            "type_params": [],
                            "params": [{"kind": "u64"}],
                            "returns": [{"kind": "datatype", "address": ADDR, "module": "zeta", "name": "Thing", "type_args": []}]
                        },
                        "broken": {"visibility": "public", "params": [{"kind": "mystery"}]}
                    }
                },
                "alpha": {
                    "address": ADDR,
                    "functions": {
                        "go": {"visibility": "private", "is_entry": true, "type_params": [{"constraints": []}], "params": [], "returns": []}
                    }
                },
                "ghost": "not a module"
            }
        })
    }

    #[test]
    fn test_from_value_decodes_modules_in_lexical_order() {
        let iface = PackageInterface::from_value(&sample_doc()).unwrap();
        let names: Vec<&str> = iface.modules.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["alpha", "zeta"]);
        assert_eq!(iface.function_count(), 2);

        let go = iface.function("alpha", "go").unwrap();
        assert_eq!(go.visibility, Visibility::Private);
        assert!(go.is_entry);
        assert_eq!(go.type_param_count, 1);
        assert_eq!(go.target(), "0xab::alpha::go");
    }

    #[test]
    fn test_broken_entries_are_kept_aside() {
        let iface = PackageInterface::from_value(&sample_doc()).unwrap();
        assert!(iface.invalid_modules.contains_key("ghost"));
        let zeta = &iface.modules["zeta"];
        assert!(zeta.malformed_functions["broken"].contains("params[0]"));
        assert_eq!(zeta.struct_names, vec!["Thing".to_string()]);
    }

    #[test]
    fn test_missing_modules_is_fatal() {
        assert_eq!(
            PackageInterface::from_value(&json!({"package_id": "0x1"})).unwrap_err(),
            InterfaceError::MissingModules
        );
        assert_eq!(
            PackageInterface::from_value(&json!([])).unwrap_err(),
            InterfaceError::NotAnObject
        );
    }
}
