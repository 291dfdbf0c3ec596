//! Chain parameters and fee-split arithmetic.
//!
//! Fees are split in basis points: `burn = fee * fee_burn_bps / 10000`
//! (integer, truncating toward zero) is destroyed, and the remainder
//! `fee - burn` is credited to the treasury. `fee_treasury_bps` is recorded
//! for reference only; the treasury share is always the remainder.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::{Amount, BPS_DENOMINATOR};

/// Economic parameters of the chain.
///
/// Fields missing from a serialized form take their default values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChainParams {
    /// Minimum admissible fee per transaction.
    pub fee_base: Amount,
    /// Basis points of each fee that are burned.
    pub fee_burn_bps: i64,
    /// Basis points of each fee credited to the treasury.
    pub fee_treasury_bps: i64,
}

impl Default for ChainParams {
    fn default() -> Self {
        Self {
            fee_base: 1,
            fee_burn_bps: 7000,
            fee_treasury_bps: 3000,
        }
    }
}

/// How a single fee was divided.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FeeSplit {
    /// Portion destroyed. Credited to no account.
    pub burned: Amount,
    /// Portion added to the treasury.
    pub to_treasury: Amount,
}

/// Parameter set violates a static constraint.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParamsError {
    #[error("basis points must be non-negative")]
    NegativeBps,

    #[error("fee_burn_bps + fee_treasury_bps = {0} exceeds 10000")]
    BpsExceedsWhole(i64),
}

impl ChainParams {
    /// Split `fee` into burned and treasury portions.
    ///
    /// The product is computed in i128 so large fees cannot overflow.
    pub fn split_fee(&self, fee: Amount) -> FeeSplit {
        let burned =
            (fee as i128 * self.fee_burn_bps as i128 / BPS_DENOMINATOR as i128) as Amount;
        FeeSplit {
            burned,
            to_treasury: fee - burned,
        }
    }

    /// Check `fee_burn_bps + fee_treasury_bps <= 10000`.
    ///
    /// Not enforced on the execution path; the fee split is well defined
    /// for any parameter values.
    pub fn validate(&self) -> Result<(), ParamsError> {
        if self.fee_burn_bps < 0 || self.fee_treasury_bps < 0 {
            return Err(ParamsError::NegativeBps);
        }
        let total = self.fee_burn_bps.saturating_add(self.fee_treasury_bps);
        if total > BPS_DENOMINATOR {
            return Err(ParamsError::BpsExceedsWhole(total));
        }
        Ok(())
    }
}
