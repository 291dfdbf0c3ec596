//! Typed transactions and their JSON wire form.
//!
//! ## Wire Format
//!
//! ```text
//! { "type": "transfer", "from": "alice", "to": "bob", "amount": 100, "fee": 10 }
//! { "type": "delegate", "delegator": "alice", "validator": "v1", "amount": 500, "fee": 5 }
//! ```
//!
//! The wire form is permissive: absent fields (or explicit `null`) take
//! zero/empty defaults and unknown fields are ignored. Field completeness
//! is checked by the executor, not here.

use serde::{Deserialize, Deserializer, Serialize};

use crate::types::{AccountId, Amount};

/// Wire tag for transfers.
pub const KIND_TRANSFER: &str = "transfer";

/// Wire tag for delegations.
pub const KIND_DELEGATE: &str = "delegate";

/// A decoded transaction.
///
/// `Unrecognized` carries payloads whose `type` tag names no known kind.
/// They decode successfully (so `CheckTx` can admit them on fee alone) and
/// are rejected by the executor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transaction {
    /// Move `amount` from `from` to `to`.
    Transfer {
        from: AccountId,
        to: AccountId,
        amount: Amount,
        fee: Amount,
    },
    /// Stake `amount` of `delegator`'s balance on `validator`.
    Delegate {
        delegator: AccountId,
        validator: AccountId,
        amount: Amount,
        fee: Amount,
    },
    /// Any other `type` tag.
    Unrecognized { kind: String, fee: Amount },
}

impl Transaction {
    /// Fee offered by this transaction. Common to every variant.
    pub fn fee(&self) -> Amount {
        match self {
            Self::Transfer { fee, .. }
            | Self::Delegate { fee, .. }
            | Self::Unrecognized { fee, .. } => *fee,
        }
    }

    /// Wire tag of this transaction.
    pub fn kind(&self) -> &str {
        match self {
            Self::Transfer { .. } => KIND_TRANSFER,
            Self::Delegate { .. } => KIND_DELEGATE,
            Self::Unrecognized { kind, .. } => kind,
        }
    }
}

/// Flat JSON representation shared by every transaction kind.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TxPayload {
    #[serde(rename = "type", deserialize_with = "null_as_default")]
    pub kind: String,

    #[serde(skip_serializing_if = "String::is_empty", deserialize_with = "null_as_default")]
    pub from: String,
    #[serde(skip_serializing_if = "String::is_empty", deserialize_with = "null_as_default")]
    pub to: String,
    #[serde(skip_serializing_if = "is_zero", deserialize_with = "null_as_default")]
    pub amount: Amount,

    #[serde(skip_serializing_if = "String::is_empty", deserialize_with = "null_as_default")]
    pub delegator: String,
    #[serde(skip_serializing_if = "String::is_empty", deserialize_with = "null_as_default")]
    pub validator: String,

    #[serde(deserialize_with = "null_as_default")]
    pub fee: Amount,
}

fn is_zero(v: &Amount) -> bool {
    *v == 0
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl From<TxPayload> for Transaction {
    fn from(p: TxPayload) -> Self {
        match p.kind.as_str() {
            KIND_TRANSFER => Self::Transfer {
                from: p.from,
                to: p.to,
                amount: p.amount,
                fee: p.fee,
            },
            KIND_DELEGATE => Self::Delegate {
                delegator: p.delegator,
                validator: p.validator,
                amount: p.amount,
                fee: p.fee,
            },
            _ => Self::Unrecognized {
                kind: p.kind,
                fee: p.fee,
            },
        }
    }
}

impl From<&Transaction> for TxPayload {
    fn from(tx: &Transaction) -> Self {
        match tx {
            Transaction::Transfer {
                from,
                to,
                amount,
                fee,
            } => Self {
                kind: KIND_TRANSFER.into(),
                from: from.clone(),
                to: to.clone(),
                amount: *amount,
                fee: *fee,
                ..Self::default()
            },
            Transaction::Delegate {
                delegator,
                validator,
                amount,
                fee,
            } => Self {
                kind: KIND_DELEGATE.into(),
                delegator: delegator.clone(),
                validator: validator.clone(),
                amount: *amount,
                fee: *fee,
                ..Self::default()
            },
            Transaction::Unrecognized { kind, fee } => Self {
                kind: kind.clone(),
                fee: *fee,
                ..Self::default()
            },
        }
    }
}
