//! Transactional state overlay for the Layer0 ledger.
//!
//! The executor stages every write of a transaction in a `StateOverlay`.
//! Reads see the committed ledger plus the staged writes. On success the
//! overlay is committed to the [`Ledger`](crate::Ledger) in one step; on
//! failure it is dropped, so a rejected transaction never leaves a partial
//! mutation behind.

use std::collections::BTreeMap;

use crate::types::{AccountId, Amount, TREASURY_ACCOUNT};

/// Addressable ledger entry.
///
/// The treasury has exactly one key. A balance lookup for the reserved
/// `"treasury"` account resolves to `StateKey::Treasury`, which keeps the
/// counter and its balance view from ever drifting apart.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum StateKey {
    /// Spendable balance of a regular account.
    Balance(AccountId),
    /// Amount staked by `delegator` on `validator`.
    Delegation {
        delegator: AccountId,
        validator: AccountId,
    },
    /// Treasury counter.
    Treasury,
}

impl StateKey {
    /// Key for the spendable balance of `account`.
    pub fn balance(account: &str) -> Self {
        if account == TREASURY_ACCOUNT {
            Self::Treasury
        } else {
            Self::Balance(account.to_string())
        }
    }

    /// Key for a delegation pair.
    pub fn delegation(delegator: &str, validator: &str) -> Self {
        Self::Delegation {
            delegator: delegator.to_string(),
            validator: validator.to_string(),
        }
    }
}

/// Something the overlay can read through to.
pub trait StateView {
    /// Committed value for `key`, zero if absent.
    fn get(&self, key: &StateKey) -> Amount;
}

/// Write buffer overlaying committed ledger state.
///
/// Uses `BTreeMap` so commit order is deterministic.
#[derive(Debug, Clone, Default)]
pub struct StateOverlay {
    writes: BTreeMap<StateKey, Amount>,
}

impl StateOverlay {
    /// Create a new empty overlay.
    pub fn new() -> Self {
        Self {
            writes: BTreeMap::new(),
        }
    }

    /// Read `key` through the overlay: staged value first, then `base`.
    pub fn get(&self, base: &dyn StateView, key: &StateKey) -> Amount {
        match self.writes.get(key) {
            Some(value) => *value,
            None => base.get(key),
        }
    }

    /// Stage a new value for `key`, replacing any earlier staged value.
    pub fn set(&mut self, key: StateKey, value: Amount) {
        self.writes.insert(key, value);
    }

    /// Consume the overlay and return all staged writes in key order.
    pub fn drain(self) -> BTreeMap<StateKey, Amount> {
        self.writes
    }
}
