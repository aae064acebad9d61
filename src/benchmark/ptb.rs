//! # Call Plans
//!
//! A [`CallPlan`] is the JSON shape handed to the external executor: an ordered
//! list of Move calls where later calls may consume the results of earlier
//! ones. The last call is always the function under analysis; everything
//! before it is setup.
//!
//! ```json
//! {"calls": [
//!   {"target": "0xa::config::new", "type_args": [], "args": []},
//!   {"target": "0xa::config::use_it", "type_args": [], "args": [{"result": 0}, {"u64": 1}]}
//! ]}
//! ```
//!
//! Synthesis appends calls in execution order, so back-references always
//! point backwards. Plans built elsewhere can be checked with
//! [`CallPlan::validate`].

use serde::{Deserialize, Serialize};

use crate::benchmark::errors::PlanError;

/// A typed literal argument.
///
/// Integers wider than 64 bits are decimal strings so JSON consumers never
/// lose precision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PureValue {
    Bool(bool),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    U128(String),
    U256(String),
    Address(String),
    /// `vector<u8>` as a `0x`-prefixed hex string.
    VectorU8Hex(String),
    VectorBool(Vec<bool>),
    VectorU16(Vec<u16>),
    VectorU32(Vec<u32>),
    VectorU64(Vec<u64>),
    VectorU128(Vec<String>),
    VectorU256(Vec<String>),
    VectorAddress(Vec<String>),
}

impl PureValue {
    pub fn bytes(bytes: &[u8]) -> Self {
        PureValue::VectorU8Hex(format!("0x{}", hex::encode(bytes)))
    }
}

/// A shared system object selected by id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SharedObjectRef {
    pub name: String,
    pub id: String,
    pub mutable: bool,
}

/// A coin owned by the sender, chosen by the executor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SenderCoin {
    pub coin_type: String,
    pub mutable: bool,
}

/// One argument of a [`Call`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PlanArg {
    /// `{"result": N}`: the value produced by call `N` of the same plan.
    Result { result: usize },
    SharedObject { shared_object: SharedObjectRef },
    SenderCoin { sender_coin: SenderCoin },
    /// `{"unresolved": "<type>"}`: no value could be synthesized for this slot.
    Unresolved { unresolved: String },
    Pure(PureValue),
}

impl PlanArg {
    pub fn result(index: usize) -> Self {
        PlanArg::Result { result: index }
    }

    pub fn unresolved(type_str: impl Into<String>) -> Self {
        PlanArg::Unresolved {
            unresolved: type_str.into(),
        }
    }

    pub fn result_index(&self) -> Option<usize> {
        match self {
            PlanArg::Result { result } => Some(*result),
            _ => None,
        }
    }

    pub fn is_unresolved(&self) -> bool {
        matches!(self, PlanArg::Unresolved { .. })
    }
}

impl From<PureValue> for PlanArg {
    fn from(value: PureValue) -> Self {
        PlanArg::Pure(value)
    }
}

/// A single Move call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Call {
    pub target: String,
    #[serde(default)]
    pub type_args: Vec<String>,
    #[serde(default)]
    pub args: Vec<PlanArg>,
}

impl Call {
    pub fn new(target: impl Into<String>, type_args: Vec<String>, args: Vec<PlanArg>) -> Self {
        Self {
            target: target.into(),
            type_args,
            args,
        }
    }
}

/// Ordered calls; the last one is the function under analysis.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallPlan {
    pub calls: Vec<Call>,
}

impl CallPlan {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a call and return a back-reference to its result.
    pub fn push(&mut self, call: Call) -> PlanArg {
        self.calls.push(call);
        PlanArg::result(self.calls.len() - 1)
    }

    pub fn len(&self) -> usize {
        self.calls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.calls.is_empty()
    }

    pub fn final_call(&self) -> Option<&Call> {
        self.calls.last()
    }

    /// Check that the plan is non-empty and every back-reference points to an
    /// earlier call.
    pub fn validate(&self) -> Result<(), PlanError> {
        if self.calls.is_empty() {
            return Err(PlanError::EmptyPlan);
        }
        for (call_index, call) in self.calls.iter().enumerate() {
            for arg in &call.args {
                if let Some(result_index) = arg.result_index() {
                    if result_index >= call_index {
                        return Err(PlanError::ForwardReference {
                            call_index,
                            result_index,
                        });
                    }
                }
            }
        }
        Ok(())
    }
}
