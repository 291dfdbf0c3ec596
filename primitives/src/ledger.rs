//! The ledger aggregate: balances, delegations, treasury, height and params.
//!
//! The treasury counter is the single source of truth for the treasury. The
//! reserved `"treasury"` balance is a derived view: [`Ledger::balance`]
//! returns the counter for that id, and writes addressed to it move the
//! counter. `balances` therefore never holds a `"treasury"` entry.

use std::collections::BTreeMap;

use thiserror::Error;

use crate::crypto::DigestBuilder;
use crate::params::ChainParams;
use crate::state::{StateKey, StateOverlay, StateView};
use crate::types::{
    AccountId, Amount, BlockHeight, Hash, GENESIS_ACCOUNTS, GENESIS_BALANCE, TREASURY_ACCOUNT,
};

/// Delegation map key: `(delegator, validator)`.
pub type DelegationKey = (AccountId, AccountId);

/// A ledger invariant does not hold.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvariantViolation {
    #[error("negative balance for {account}: {amount}")]
    NegativeBalance { account: AccountId, amount: Amount },

    #[error("negative delegation {delegator}->{validator}: {amount}")]
    NegativeDelegation {
        delegator: AccountId,
        validator: AccountId,
        amount: Amount,
    },

    #[error("negative treasury: {0}")]
    NegativeTreasury(Amount),

    #[error("balances map holds reserved key {0:?}")]
    ReservedKeyInBalances(&'static str),
}

/// Authoritative account ledger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ledger {
    height: BlockHeight,
    balances: BTreeMap<AccountId, Amount>,
    delegations: BTreeMap<DelegationKey, Amount>,
    treasury: Amount,
    params: ChainParams,
}

impl Ledger {
    /// Empty ledger at height 0 with the given params.
    pub fn new(params: ChainParams) -> Self {
        Self {
            height: 0,
            balances: BTreeMap::new(),
            delegations: BTreeMap::new(),
            treasury: 0,
            params,
        }
    }

    /// Fixed genesis: `alice` and `bob` hold 1,000,000 each, treasury is
    /// zero, default params.
    pub fn genesis() -> Self {
        let mut ledger = Self::new(ChainParams::default());
        for account in GENESIS_ACCOUNTS {
            ledger.balances.insert(account.to_string(), GENESIS_BALANCE);
        }
        ledger
    }

    /// Rebuild a ledger from its parts, e.g. from a snapshot.
    ///
    /// `balances` must not contain the reserved treasury key; callers
    /// reconcile the mirrored entry first.
    pub fn from_parts(
        height: BlockHeight,
        balances: BTreeMap<AccountId, Amount>,
        delegations: BTreeMap<DelegationKey, Amount>,
        treasury: Amount,
        params: ChainParams,
    ) -> Result<Self, InvariantViolation> {
        let ledger = Self {
            height,
            balances,
            delegations,
            treasury,
            params,
        };
        ledger.check_invariants()?;
        Ok(ledger)
    }

    pub fn height(&self) -> BlockHeight {
        self.height
    }

    /// Record the engine-supplied height of the last finalized block.
    pub fn set_height(&mut self, height: BlockHeight) {
        self.height = height;
    }

    pub fn params(&self) -> &ChainParams {
        &self.params
    }

    pub fn treasury(&self) -> Amount {
        self.treasury
    }

    /// Spendable balance of `account`, zero if unknown.
    ///
    /// For the reserved treasury id this is the treasury counter.
    pub fn balance(&self, account: &str) -> Amount {
        self.get(&StateKey::balance(account))
    }

    /// Amount staked by `delegator` on `validator`, zero if none.
    pub fn delegation(&self, delegator: &str, validator: &str) -> Amount {
        self.get(&StateKey::delegation(delegator, validator))
    }

    /// Regular account balances (the treasury view is not included).
    pub fn balances(&self) -> &BTreeMap<AccountId, Amount> {
        &self.balances
    }

    pub fn delegations(&self) -> &BTreeMap<DelegationKey, Amount> {
        &self.delegations
    }

    /// Apply every staged write of `overlay`.
    pub fn commit(&mut self, overlay: StateOverlay) {
        for (key, value) in overlay.drain() {
            match key {
                StateKey::Balance(account) => {
                    self.balances.insert(account, value);
                }
                StateKey::Delegation {
                    delegator,
                    validator,
                } => {
                    self.delegations.insert((delegator, validator), value);
                }
                StateKey::Treasury => self.treasury = value,
            }
        }
    }

    /// Sum of balances, treasury and delegated stake.
    ///
    /// Widened to i128 so the sum itself cannot overflow.
    pub fn total_supply(&self) -> i128 {
        let balances: i128 = self.balances.values().map(|v| *v as i128).sum();
        let staked: i128 = self.delegations.values().map(|v| *v as i128).sum();
        balances + staked + self.treasury as i128
    }

    /// Verify that nothing is negative and the reserved key is absent.
    pub fn check_invariants(&self) -> Result<(), InvariantViolation> {
        if self.balances.contains_key(TREASURY_ACCOUNT) {
            return Err(InvariantViolation::ReservedKeyInBalances(TREASURY_ACCOUNT));
        }
        for (account, amount) in &self.balances {
            if *amount < 0 {
                return Err(InvariantViolation::NegativeBalance {
                    account: account.clone(),
                    amount: *amount,
                });
            }
        }
        for ((delegator, validator), amount) in &self.delegations {
            if *amount < 0 {
                return Err(InvariantViolation::NegativeDelegation {
                    delegator: delegator.clone(),
                    validator: validator.clone(),
                    amount: *amount,
                });
            }
        }
        if self.treasury < 0 {
            return Err(InvariantViolation::NegativeTreasury(self.treasury));
        }
        Ok(())
    }

    /// BLAKE3 digest over the full ledger content in canonical order.
    pub fn digest(&self) -> Hash {
        let mut d = DigestBuilder::new("layer0/ledger/v1");
        d.write_i64(self.height)
            .write_i64(self.params.fee_base)
            .write_i64(self.params.fee_burn_bps)
            .write_i64(self.params.fee_treasury_bps)
            .write_i64(self.treasury)
            .write_i64(self.balances.len() as i64);
        for (account, amount) in &self.balances {
            d.write_str(account).write_i64(*amount);
        }
        d.write_i64(self.delegations.len() as i64);
        for ((delegator, validator), amount) in &self.delegations {
            d.write_str(delegator).write_str(validator).write_i64(*amount);
        }
        d.finish()
    }
}

impl StateView for Ledger {
    fn get(&self, key: &StateKey) -> Amount {
        match key {
            StateKey::Balance(account) => self.balances.get(account).copied().unwrap_or(0),
            StateKey::Delegation {
                delegator,
                validator,
            } => {
                // BTreeMap<(String, String), _> cannot be probed with (&str, &str).
                self.delegations
                    .get(&(delegator.clone(), validator.clone()))
                    .copied()
                    .unwrap_or(0)
            }
            StateKey::Treasury => self.treasury,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_genesis_contents() {
        let ledger = Ledger::genesis();
        assert_eq!(ledger.height(), 0);
        assert_eq!(ledger.balance("alice"), 1_000_000);
        assert_eq!(ledger.balance("bob"), 1_000_000);
        assert_eq!(ledger.balance(TREASURY_ACCOUNT), 0);
        assert_eq!(ledger.treasury(), 0);
        assert_eq!(*ledger.params(), ChainParams::default());
        assert!(ledger.delegations().is_empty());
        assert!(ledger.check_invariants().is_ok());
    }

    #[test]
    fn test_unknown_account_is_zero() {
        let ledger = Ledger::genesis();
        assert_eq!(ledger.balance("carol"), 0);
        assert_eq!(ledger.delegation("alice", "v1"), 0);
    }

    #[test]
    fn test_commit_routes_treasury_view_to_counter() {
        let mut ledger = Ledger::genesis();
        let mut overlay = StateOverlay::new();
        overlay.set(StateKey::balance(TREASURY_ACCOUNT), 9);
        overlay.set(StateKey::balance("alice"), 10);
        overlay.set(StateKey::delegation("alice", "v1"), 5);
        ledger.commit(overlay);

        assert_eq!(ledger.treasury(), 9);
        assert_eq!(ledger.balance(TREASURY_ACCOUNT), 9);
        assert!(!ledger.balances().contains_key(TREASURY_ACCOUNT));
        assert_eq!(ledger.balance("alice"), 10);
        assert_eq!(ledger.delegation("alice", "v1"), 5);
    }

    #[test]
    fn test_total_supply_genesis() {
        assert_eq!(Ledger::genesis().total_supply(), 2_000_000);
    }

    #[test]
    fn test_from_parts_rejects_negative_balance() {
        let mut balances = BTreeMap::new();
        balances.insert("alice".to_string(), -1);
        let err = Ledger::from_parts(0, balances, BTreeMap::new(), 0, ChainParams::default())
            .unwrap_err();
        assert!(matches!(err, InvariantViolation::NegativeBalance { .. }));
    }

    #[test]
    fn test_from_parts_rejects_reserved_key() {
        let mut balances = BTreeMap::new();
        balances.insert(TREASURY_ACCOUNT.to_string(), 0);
        let err = Ledger::from_parts(0, balances, BTreeMap::new(), 0, ChainParams::default())
            .unwrap_err();
        assert_eq!(err, InvariantViolation::ReservedKeyInBalances(TREASURY_ACCOUNT));
    }

    #[test]
    fn test_digest_is_content_sensitive() {
        let a = Ledger::genesis();
        let mut b = Ledger::genesis();
        assert_eq!(a.digest(), b.digest());

        b.set_height(1);
        assert_ne!(a.digest(), b.digest());
    }
}
