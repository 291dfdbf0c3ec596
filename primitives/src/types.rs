//! Core type aliases and constants for the Layer0 hub chain.
//!
//! These types are shared by the ledger, the executor, and the protocol
//! handler.

/// 32-byte BLAKE3 digest.
pub type Hash = [u8; 32];

/// Account identifier. Accounts are plain UTF-8 names (`"alice"`, `"v1"`).
pub type AccountId = String;

/// Block height as supplied by the consensus engine.
pub type BlockHeight = i64;

/// Signed integer amount of the native unit.
pub type Amount = i64;

/// Application identity reported by `Info`.
pub const APP_NAME: &str = "layer0-hub-chain";

/// Application version reported by `Info`.
pub const APP_VERSION: &str = "0.1.0";

/// Reserved balance key that mirrors the treasury counter.
pub const TREASURY_ACCOUNT: &str = "treasury";

/// Denominator for basis-point fractions.
pub const BPS_DENOMINATOR: i64 = 10_000;

/// Funding for each genesis account.
pub const GENESIS_BALANCE: Amount = 1_000_000;

/// Accounts funded at genesis.
pub const GENESIS_ACCOUNTS: [&str; 2] = ["alice", "bob"];

/// Compute the application fingerprint returned to the consensus engine.
///
/// The fingerprint depends on the height alone: `"h:<height>"` as bytes.
/// Every replica at the same height reports the same value.
pub fn app_hash(height: BlockHeight) -> Vec<u8> {
    format!("h:{}", height).into_bytes()
}

/// Convert a `Hash` to a hex string for display purposes.
pub fn hash_to_hex(hash: &Hash) -> String {
    let mut s = String::with_capacity(66);
    s.push_str("0x");
    for byte in hash {
        use std::fmt::Write;
        let _ = write!(s, "{:02x}", byte);
    }
    s
}
