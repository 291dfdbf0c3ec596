//! Error types and result codes for the Layer0 hub chain.
//!
//! `DecodeError` and `ValidationError` are surfaced per transaction and never
//! abort a block. `ResultCode` is the numeric status reported back to the
//! consensus engine for `CheckTx` and each `FinalizeBlock` transaction.

use thiserror::Error;

use crate::types::Amount;

/// Per-transaction result codes reported to the consensus engine.
///
/// These repr values are part of the external contract and MUST NOT change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum ResultCode {
    Ok = 0,
    DecodeFailed = 1,
    Rejected = 2,
}

impl ResultCode {
    /// Convert from a u32 status code.
    pub fn from_u32(code: u32) -> Option<Self> {
        match code {
            0 => Some(Self::Ok),
            1 => Some(Self::DecodeFailed),
            2 => Some(Self::Rejected),
            _ => None,
        }
    }

    /// Return the u32 representation of this code.
    pub fn as_u32(self) -> u32 {
        self as u32
    }

    /// Returns true if this is the `Ok` variant.
    pub fn is_ok(self) -> bool {
        matches!(self, Self::Ok)
    }
}

impl std::fmt::Display for ResultCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Ok => write!(f, "OK"),
            Self::DecodeFailed => write!(f, "ERR_DECODE"),
            Self::Rejected => write!(f, "ERR_REJECTED"),
        }
    }
}

/// Transaction payload could not be turned into a [`Transaction`](crate::Transaction).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// Payload was empty after trimming whitespace.
    #[error("empty tx")]
    EmptyPayload,

    /// Payload was neither a JSON transaction nor base64 of one.
    #[error("bad json tx: {0}")]
    MalformedTransaction(String),
}

/// A decoded transaction was rejected by the executor.
///
/// Rejection leaves the ledger exactly as it was before the transaction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Fee is below `ChainParams::fee_base`.
    #[error("fee too low: {fee} (min {min})")]
    FeeTooLow { fee: Amount, min: Amount },

    /// A required account field was empty.
    #[error("missing {0}")]
    MissingField(&'static str),

    /// Amount was zero or negative.
    #[error("amount must be > 0")]
    NonPositiveAmount,

    /// Payer cannot cover `amount + fee`.
    #[error("insufficient balance: have {have}, need {need}")]
    InsufficientBalance { have: Amount, need: Amount },

    /// `type` tag did not name a known transaction kind.
    #[error("unknown tx type: {0}")]
    UnknownTransactionType(String),

    /// An intermediate sum would not fit in an i64.
    #[error("arithmetic overflow")]
    ArithmeticOverflow,
}
