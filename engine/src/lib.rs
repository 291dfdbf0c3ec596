//! `layer0-engine` — deterministic transaction executor for the Layer0 hub chain.
//!
//! This crate implements the state transition function:
//! `f(ledger, height, ordered_txs) → (ledger', tx_results, app_hash)`
//!
//! It processes blocks transaction-by-transaction. Each transaction is
//! decoded, validated and applied on its own; a rejected transaction leaves
//! the ledger untouched but never aborts the block.
//!
//! ## Architecture
//!
//! - [`validation`] — fee floor and field checks, plus the `CheckTx` pre-filter
//! - [`executor`] — single-transaction apply with fee settlement
//! - [`block::BlockExecutor`] — top-level block execution entry point

pub mod validation;
pub mod executor;
pub mod block;

// Re-export key types for convenience
pub use block::BlockExecutor;
pub use executor::apply_transaction;
pub use validation::check_transaction;
