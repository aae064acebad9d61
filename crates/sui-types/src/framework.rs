//! Sui framework constants and well-known addresses.
//!
//! Compile-time constants for the framework packages, the shared system objects,
//! and the module/type names the synthesizer treats specially. Keeping them here
//! avoids repeated `AccountAddress::from_hex_literal("0x2")` calls across crates.
//!
//! # Example
//!
//! ```
//! use sui_synth_types::framework::{CLOCK_OBJECT_ID, SUI_FRAMEWORK};
//!
//! assert_eq!(SUI_FRAMEWORK.to_hex_literal(), "0x2");
//! assert_eq!(CLOCK_OBJECT_ID.to_hex_literal(), "0x6");
//! ```

use move_core_types::account_address::AccountAddress;

// ============================================================================
// Framework Package Addresses
// ============================================================================

/// Move standard library address (0x1)
pub const MOVE_STDLIB: AccountAddress = AccountAddress::ONE;

/// Sui framework address (0x2)
pub const SUI_FRAMEWORK: AccountAddress = short_address(0x00, 0x02);

// ============================================================================
// Well-Known Object IDs
// ============================================================================

/// Clock object ID (0x6)
pub const CLOCK_OBJECT_ID: AccountAddress = short_address(0x00, 0x06);

/// Random object ID (0x8)
pub const RANDOM_OBJECT_ID: AccountAddress = short_address(0x00, 0x08);

/// Deny list object ID (0x403)
pub const DENY_LIST_OBJECT_ID: AccountAddress = short_address(0x04, 0x03);

/// Build an address whose only non-zero bytes are the last two.
const fn short_address(hi: u8, lo: u8) -> AccountAddress {
    let mut bytes = [0u8; 32];
    bytes[30] = hi;
    bytes[31] = lo;
    AccountAddress::new(bytes)
}

// ============================================================================
// Module and Type Names
// ============================================================================

pub const TX_CONTEXT_MODULE: &str = "tx_context";
pub const TX_CONTEXT_TYPE: &str = "TxContext";

pub const CLOCK_MODULE: &str = "clock";
pub const CLOCK_TYPE: &str = "Clock";

pub const RANDOM_MODULE: &str = "random";
pub const RANDOM_TYPE: &str = "Random";

pub const DENY_LIST_MODULE: &str = "deny_list";
pub const DENY_LIST_TYPE: &str = "DenyList";

pub const COIN_MODULE: &str = "coin";
pub const COIN_TYPE: &str = "Coin";

pub const SUI_MODULE: &str = "sui";
pub const SUI_TYPE: &str = "SUI";

pub const STRING_MODULE: &str = "string";
pub const ASCII_MODULE: &str = "ascii";
pub const STRING_TYPE: &str = "String";

pub const URL_MODULE: &str = "url";
pub const URL_TYPE: &str = "Url";

pub const OPTION_MODULE: &str = "option";
pub const OPTION_TYPE: &str = "Option";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_framework_addresses() {
        assert_eq!(
            MOVE_STDLIB,
            AccountAddress::from_hex_literal("0x1").unwrap()
        );
        assert_eq!(
            SUI_FRAMEWORK,
            AccountAddress::from_hex_literal("0x2").unwrap()
        );
    }

    #[test]
    fn test_well_known_objects() {
        assert_eq!(
            CLOCK_OBJECT_ID,
            AccountAddress::from_hex_literal("0x6").unwrap()
        );
        assert_eq!(
            RANDOM_OBJECT_ID,
            AccountAddress::from_hex_literal("0x8").unwrap()
        );
        assert_eq!(
            DENY_LIST_OBJECT_ID,
            AccountAddress::from_hex_literal("0x403").unwrap()
        );
    }
}
