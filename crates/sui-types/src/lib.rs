//! Shared types for the sui-ptb-synth workspace.
//!
//! - [`move_type`]: the canonical [`MoveType`] model and its string form
//! - [`type_parsing`]: parser for canonical type strings
//! - [`framework`]: framework package addresses, system object ids, and names
//! - [`address`]: address normalization between short and full forms
//! - [`env_utils`]: environment variable helpers

pub mod address;
pub mod env_utils;
pub mod framework;
pub mod move_type;
pub mod type_parsing;

pub use move_type::{
    is_mutable_tx_context_tail, strip_trailing_context, strip_trailing_tx_context, DatatypeTag,
    MoveType, TypeName,
};
pub use type_parsing::parse_move_type;

// Re-exported so downstream crates name addresses without a direct dependency.
pub use move_core_types::account_address::AccountAddress;
