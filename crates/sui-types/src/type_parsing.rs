//! Canonical type string parsing.
//!
//! Inverse of `MoveType`'s `Display`: every string produced by `to_string()`
//! parses back to the same value. Also accepts full-length addresses.

use crate::address::parse_address;
use crate::move_type::MoveType;

/// Parse a canonical Move type string into a [`MoveType`].
///
/// Supports:
/// - Primitive types: `bool`, `u8`, `u16`, `u32`, `u64`, `u128`, `u256`, `address`, `signer`
/// - Vector types: `vector<T>`
/// - References: `&T`, `&mut T`
/// - Type parameters: `T0`, `T1`, ...
/// - Datatypes: `0x2::module::Name` or `0x2::module::Name<T1, T2>`
///
/// # Examples
///
/// ```
/// use sui_synth_types::type_parsing::parse_move_type;
///
/// let ty = parse_move_type("0x2::coin::Coin<0x2::sui::SUI>").unwrap();
/// assert_eq!(ty.to_string(), "0x2::coin::Coin<0x2::sui::SUI>");
/// ```
pub fn parse_move_type(type_str: &str) -> Option<MoveType> {
    let type_str = type_str.trim();

    match type_str {
        "bool" => return Some(MoveType::Bool),
        "u8" => return Some(MoveType::U8),
        "u16" => return Some(MoveType::U16),
        "u32" => return Some(MoveType::U32),
        "u64" => return Some(MoveType::U64),
        "u128" => return Some(MoveType::U128),
        "u256" => return Some(MoveType::U256),
        "address" => return Some(MoveType::Address),
        "signer" => return Some(MoveType::Signer),
        _ => {}
    }

    if let Some(inner) = type_str.strip_prefix("&mut ") {
        return Some(MoveType::reference(true, parse_move_type(inner)?));
    }
    if let Some(inner) = type_str.strip_prefix('&') {
        return Some(MoveType::reference(false, parse_move_type(inner)?));
    }

    if let Some(inner) = type_str
        .strip_prefix("vector<")
        .and_then(|s| s.strip_suffix('>'))
    {
        return Some(MoveType::vector(parse_move_type(inner)?));
    }

    if let Some(index) = type_str.strip_prefix('T') {
        if !index.is_empty() && index.chars().all(|c| c.is_ascii_digit()) {
            return Some(MoveType::TypeParam {
                index: index.parse().ok()?,
            });
        }
    }

    parse_datatype(type_str)
}

/// `0x<address>::<module>::<name><type_args>`
fn parse_datatype(type_str: &str) -> Option<MoveType> {
    let (base_type, type_args_str) = match type_str.find('<') {
        Some(angle_pos) => (&type_str[..angle_pos], Some(&type_str[angle_pos..])),
        None => (type_str, None),
    };

    let parts: Vec<&str> = base_type.split("::").collect();
    let [address_str, module_name, type_name] = parts.as_slice() else {
        return None;
    };
    if !is_identifier(module_name) || !is_identifier(type_name) {
        return None;
    }
    let address = parse_address(address_str)?;

    let type_args = match type_args_str {
        Some(args_str) => {
            let inner = args_str.strip_prefix('<')?.strip_suffix('>')?;
            if inner.trim().is_empty() {
                return None;
            }
            split_type_params(inner)
                .into_iter()
                .map(parse_move_type)
                .collect::<Option<Vec<_>>>()?
        }
        None => vec![],
    };

    Some(MoveType::datatype(address, *module_name, *type_name, type_args))
}

/// Move identifier: ASCII letter or `_`, then letters, digits, or `_`.
pub fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Split type parameters respecting nested angle brackets.
///
/// Given "A, B<C, D>, E", returns ["A", "B<C, D>", "E"] by tracking bracket depth.
pub fn split_type_params(s: &str) -> Vec<&str> {
    let mut result = Vec::new();
    let mut depth = 0i32;
    let mut start = 0;

    for (i, c) in s.char_indices() {
        match c {
            '<' => depth += 1,
            '>' => depth -= 1,
            ',' if depth == 0 => {
                result.push(s[start..i].trim());
                start = i + 1;
            }
            _ => {}
        }
    }

    if start < s.len() {
        result.push(s[start..].trim());
    }

    result
}
