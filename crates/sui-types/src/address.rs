//! Address normalization for interface documents and canonical type strings.
//!
//! Interface documents carry addresses in full form
//! (`0x` followed by 64 hex digits), while canonical type strings use the short
//! form (`0x2`). Everything inside the workspace works on [`AccountAddress`]; the
//! string forms only exist at the edges.

use move_core_types::account_address::AccountAddress;

/// Normalize an address to lowercase with 0x prefix and full 64 hex characters.
///
/// Returns `None` for empty input, non-hex characters, or more than 64 digits.
///
/// # Examples
///
/// ```
/// use sui_synth_types::address::normalize_address;
///
/// assert_eq!(
///     normalize_address("0x2").as_deref(),
///     Some("0x0000000000000000000000000000000000000000000000000000000000000002")
/// );
/// assert_eq!(normalize_address("not-hex"), None);
/// ```
pub fn normalize_address(addr: &str) -> Option<String> {
    let addr = addr.trim();
    let hex = addr
        .strip_prefix("0x")
        .or_else(|| addr.strip_prefix("0X"))
        .unwrap_or(addr);
    if hex.is_empty() || hex.len() > 64 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    Some(format!("0x{:0>64}", hex.to_ascii_lowercase()))
}

/// Parse a string address into an AccountAddress.
///
/// Accepts short (`0x2`), full, and unprefixed forms.
pub fn parse_address(addr: &str) -> Option<AccountAddress> {
    let normalized = normalize_address(addr)?;
    AccountAddress::from_hex_literal(&normalized).ok()
}

/// Full-form string (`0x` + 64 hex digits), as written in interface documents.
pub fn address_to_string(addr: &AccountAddress) -> String {
    addr.to_canonical_string(true)
}

/// Short-form string used inside canonical type strings (`0x2`, `0xabc`).
pub fn address_to_short_string(addr: &AccountAddress) -> String {
    addr.to_hex_literal()
}

/// Serde adapter writing addresses in full form and reading any accepted form.
pub mod serde_full {
    use super::{address_to_string, parse_address};
    use move_core_types::account_address::AccountAddress;
    use serde::{de::Error, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(addr: &AccountAddress, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&address_to_string(addr))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<AccountAddress, D::Error> {
        let raw = String::deserialize(d)?;
        parse_address(&raw).ok_or_else(|| D::Error::custom(format!("invalid address: {raw}")))
    }
}
