//! Single-transaction executor with fee settlement.
//!
//! `apply_transaction` stages every write in a [`StateOverlay`] and commits
//! only after all checks pass:
//!
//! 1. Fee floor (`fee >= fee_base`), for every variant
//! 2. Variant checks (accounts present, `amount > 0`, payer covers `amount + fee`)
//! 3. Variant effect
//! 4. Fee split: `fee * fee_burn_bps / 10000` is burned, the rest goes to
//!    the treasury
//!
//! A rejected transaction leaves the ledger exactly as it found it. Earlier
//! transactions in the same block are not affected.

use layer0_primitives::{
    Amount, FeeSplit, Ledger, StateKey, StateOverlay, StateView, Transaction, ValidationError,
};

use crate::validation::{validate_accounts, validate_amount, validate_fee};

/// Validate and apply one transaction, returning how its fee was split.
pub fn apply_transaction(
    ledger: &mut Ledger,
    tx: &Transaction,
) -> Result<FeeSplit, ValidationError> {
    let (overlay, split) = stage_transaction(ledger, tx)?;
    ledger.commit(overlay);
    Ok(split)
}

/// Compute the writes of `tx` without touching `ledger`.
pub fn stage_transaction(
    ledger: &Ledger,
    tx: &Transaction,
) -> Result<(StateOverlay, FeeSplit), ValidationError> {
    let fee = tx.fee();
    validate_fee(ledger.params(), fee)?;

    let mut overlay = StateOverlay::new();
    match tx {
        Transaction::Transfer {
            from, to, amount, ..
        } => {
            validate_accounts(from, to, "from/to")?;
            validate_amount(*amount)?;
            debit(ledger, &mut overlay, from, *amount, fee)?;
            credit(ledger, &mut overlay, StateKey::balance(to), *amount)?;
        }
        Transaction::Delegate {
            delegator,
            validator,
            amount,
            ..
        } => {
            validate_accounts(delegator, validator, "delegator/validator")?;
            validate_amount(*amount)?;
            debit(ledger, &mut overlay, delegator, *amount, fee)?;
            credit(
                ledger,
                &mut overlay,
                StateKey::delegation(delegator, validator),
                *amount,
            )?;
        }
        Transaction::Unrecognized { kind, .. } => {
            return Err(ValidationError::UnknownTransactionType(kind.clone()));
        }
    }

    // The burned part is credited nowhere.
    let split = ledger.params().split_fee(fee);
    credit(ledger, &mut overlay, StateKey::Treasury, split.to_treasury)?;

    Ok((overlay, split))
}

/// Debit `amount + fee` from `account`, failing if it cannot cover it.
fn debit(
    base: &dyn StateView,
    overlay: &mut StateOverlay,
    account: &str,
    amount: Amount,
    fee: Amount,
) -> Result<(), ValidationError> {
    let key = StateKey::balance(account);
    let need = amount
        .checked_add(fee)
        .ok_or(ValidationError::ArithmeticOverflow)?;
    let have = overlay.get(base, &key);
    if have < need {
        return Err(ValidationError::InsufficientBalance { have, need });
    }
    let remaining = have
        .checked_sub(need)
        .ok_or(ValidationError::ArithmeticOverflow)?;
    overlay.set(key, remaining);
    Ok(())
}

/// Credit `amount` to `key`.
fn credit(
    base: &dyn StateView,
    overlay: &mut StateOverlay,
    key: StateKey,
    amount: Amount,
) -> Result<(), ValidationError> {
    let current = overlay.get(base, &key);
    let updated = current
        .checked_add(amount)
        .ok_or(ValidationError::ArithmeticOverflow)?;
    overlay.set(key, updated);
    Ok(())
}
