//! Transaction validation logic.
//!
//! The checks here run before any state is staged. `check_transaction` is
//! the cheap admission filter used by `CheckTx`: it decodes the payload and
//! enforces the fee floor, nothing more. Balance sufficiency and field
//! completeness are only checked at finalization, so a transaction admitted
//! here may still be rejected in a block.

use layer0_primitives::{
    decode_transaction, Amount, ChainParams, Ledger, ResultCode, TxResult, ValidationError,
};

/// Enforce `fee >= params.fee_base`.
pub fn validate_fee(params: &ChainParams, fee: Amount) -> Result<(), ValidationError> {
    if fee < params.fee_base {
        return Err(ValidationError::FeeTooLow {
            fee,
            min: params.fee_base,
        });
    }
    Ok(())
}

/// Require both account ids of a pair to be non-empty.
///
/// `label` names the pair in the error (`"from/to"`).
pub fn validate_accounts(a: &str, b: &str, label: &'static str) -> Result<(), ValidationError> {
    if a.is_empty() || b.is_empty() {
        return Err(ValidationError::MissingField(label));
    }
    Ok(())
}

/// Require `amount > 0`.
pub fn validate_amount(amount: Amount) -> Result<(), ValidationError> {
    if amount <= 0 {
        return Err(ValidationError::NonPositiveAmount);
    }
    Ok(())
}

/// `CheckTx` admission filter. Never mutates the ledger.
///
/// - decode failure → code 1
/// - fee below the floor → code 2
/// - otherwise → code 0
pub fn check_transaction(ledger: &Ledger, raw: &[u8]) -> TxResult {
    let tx = match decode_transaction(raw) {
        Ok(tx) => tx,
        Err(err) => return TxResult::failure(ResultCode::DecodeFailed, err.to_string()),
    };
    match validate_fee(ledger.params(), tx.fee()) {
        Ok(()) => TxResult::ok(),
        Err(err) => TxResult::failure(ResultCode::Rejected, err.to_string()),
    }
}
