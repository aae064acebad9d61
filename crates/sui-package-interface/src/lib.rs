//! Package interface documents.
//!
//! Decodes the JSON interface of a Sui Move package (modules, structs, and
//! function signatures) into the typed model the synthesizer works on.
//!
//! Both the canonical type JSON (`{"kind": "datatype", ...}`) and the RPC
//! normalized shape (`{"Struct": {...}}`, `"U64"`) are accepted.
//!
//! # Example
//!
//! ```
//! use sui_package_interface::PackageInterface;
//!
//! let doc = serde_json::json!({
//!     "modules": {
//!         "m": {
//!             "address": "0x2",
//!             "functions": {
//!                 "f": {"visibility": "public", "is_entry": true, "params": [{"kind": "u64"}]}
//!             }
//!         }
//!     }
//! });
//! let iface = PackageInterface::from_value(&doc).unwrap();
//! assert_eq!(iface.function("m", "f").unwrap().target(), "0x2::m::f");
//! ```

pub mod normalization;
pub mod types;

pub use normalization::{normalize_visibility, type_from_value};
pub use types::{FunctionSignature, InterfaceError, ModuleInterface, PackageInterface, Visibility};

/// Read and decode an interface document from disk.
pub fn load_interface(path: &std::path::Path) -> anyhow::Result<PackageInterface> {
    use anyhow::Context;

    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let value: serde_json::Value = serde_json::from_str(&raw)
        .with_context(|| format!("failed to parse {}", path.display()))?;
    PackageInterface::from_value(&value)
        .with_context(|| format!("invalid interface document {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_interface_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"modules": {{"m": {{"address": "0x2", "functions": {{}}}}}}}}"#).unwrap();
        let iface = load_interface(file.path()).unwrap();
        assert_eq!(iface.modules.len(), 1);
    }

    #[test]
    fn test_load_interface_reports_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        let err = load_interface(file.path()).unwrap_err();
        assert!(err.to_string().contains("failed to parse"));
    }
}
