//! `layer0-primitives` — foundational types for the Layer0 hub chain.
//!
//! This crate provides the ledger aggregate, chain parameters, the typed
//! transaction model and its codec, result codes, and the state overlay
//! shared by the executor and the protocol handler.

pub mod types;
pub mod error;
pub mod params;
pub mod crypto;
pub mod state;
pub mod ledger;
pub mod transaction;
pub mod codec;
pub mod execution;

// Re-export commonly used types at the crate root for convenience.
pub use types::{AccountId, Amount, BlockHeight, Hash, APP_NAME, APP_VERSION, TREASURY_ACCOUNT};
pub use error::{DecodeError, ResultCode, ValidationError};
pub use params::{ChainParams, FeeSplit, ParamsError};
pub use state::{StateKey, StateOverlay, StateView};
pub use ledger::{DelegationKey, InvariantViolation, Ledger};
pub use transaction::{Transaction, TxPayload};
pub use codec::{decode_transaction, encode_transaction, encode_transaction_base64};
pub use execution::{BlockOutcome, TxResult};
