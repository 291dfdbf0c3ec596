//! Execution boundary types: per-transaction results and block outcomes.
//!
//! These are what the protocol handler reports back to the consensus
//! engine for `CheckTx` and `FinalizeBlock`.

use serde::{Deserialize, Serialize};

use crate::error::ResultCode;
use crate::params::FeeSplit;
use crate::types::{Amount, BlockHeight};

/// Outcome of one transaction, as reported to the consensus engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxResult {
    /// 0 = success, 1 = decode failure, 2 = rejected.
    pub code: u32,
    /// Human-readable reason for a non-zero code. Empty on success.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub log: String,
}

impl TxResult {
    /// Successful result.
    pub fn ok() -> Self {
        Self {
            code: ResultCode::Ok.as_u32(),
            log: String::new(),
        }
    }

    /// Failed result with the given code and message.
    pub fn failure(code: ResultCode, log: impl Into<String>) -> Self {
        Self {
            code: code.as_u32(),
            log: log.into(),
        }
    }

    /// Typed view of `code`, `None` for a code this crate never emits.
    pub fn result_code(&self) -> Option<ResultCode> {
        ResultCode::from_u32(self.code)
    }

    /// Returns true if `code` is 0.
    pub fn is_ok(&self) -> bool {
        self.result_code().is_some_and(ResultCode::is_ok)
    }
}

/// Result of executing one block against a ledger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockOutcome {
    /// Engine-supplied height the ledger now sits at.
    pub height: BlockHeight,
    /// One entry per input transaction, in input order.
    pub tx_results: Vec<TxResult>,
    /// Application fingerprint for `height`.
    pub app_hash: Vec<u8>,
    /// Total fees burned by successful transactions.
    pub burned: Amount,
    /// Total fees credited to the treasury.
    pub to_treasury: Amount,
}

impl BlockOutcome {
    /// Number of transactions that succeeded.
    pub fn accepted(&self) -> usize {
        self.tx_results.iter().filter(|r| r.is_ok()).count()
    }

    /// Fold a fee split into the block totals.
    pub fn record_fee(&mut self, split: FeeSplit) {
        self.burned = self.burned.saturating_add(split.burned);
        self.to_treasury = self.to_treasury.saturating_add(split.to_treasury);
    }
}
