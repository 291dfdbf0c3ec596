//! Hashing helpers for the Layer0 ledger.
//!
//! BLAKE3 is used for the ledger content digest. The digest is a
//! diagnostic commitment for logs and cross-replica comparison; it is not
//! the fingerprint reported to the consensus engine (see [`crate::types::app_hash`]).

use crate::types::Hash;

/// Incremental digest builder with length-prefixed fields.
///
/// Each field is written as `u64 LE length || bytes` so that adjacent
/// fields can never be confused (`"ab" + "c"` vs `"a" + "bc"`).
pub struct DigestBuilder {
    hasher: blake3::Hasher,
}

impl DigestBuilder {
    /// Start a digest under a domain-separation tag.
    pub fn new(domain: &str) -> Self {
        let mut builder = Self {
            hasher: blake3::Hasher::new(),
        };
        builder.write_bytes(domain.as_bytes());
        builder
    }

    /// Append a length-prefixed byte field.
    pub fn write_bytes(&mut self, bytes: &[u8]) -> &mut Self {
        self.hasher.update(&(bytes.len() as u64).to_le_bytes());
        self.hasher.update(bytes);
        self
    }

    /// Append a string field.
    pub fn write_str(&mut self, s: &str) -> &mut Self {
        self.write_bytes(s.as_bytes())
    }

    /// Append a signed integer (8 bytes LE).
    pub fn write_i64(&mut self, v: i64) -> &mut Self {
        self.hasher.update(&v.to_le_bytes());
        self
    }

    /// Finish and return the 32-byte digest.
    pub fn finish(&self) -> Hash {
        *self.hasher.finalize().as_bytes()
    }
}
