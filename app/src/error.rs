//! Application error types.

use std::path::PathBuf;

use layer0_primitives::InvariantViolation;

/// Snapshot could not be read, written, or trusted.
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    /// Filesystem failure on the snapshot or its temporary file.
    #[error("snapshot i/o error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Ledger could not be serialized.
    #[error("snapshot encode error: {0}")]
    Encode(#[source] serde_json::Error),

    /// File is non-empty but is not a valid snapshot document.
    #[error("corrupt snapshot at {path}: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Treasury counter and its mirrored balance entry disagree.
    #[error("treasury mismatch: counter {counter}, balance entry {mirrored}")]
    TreasuryMismatch { counter: i64, mirrored: i64 },

    /// Restored ledger violates an invariant.
    #[error("snapshot violates ledger invariant: {0}")]
    Invariant(#[from] InvariantViolation),
}

/// Configuration could not be resolved.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid listen address {value:?}: {source}")]
    ListenAddr {
        value: String,
        #[source]
        source: std::net::AddrParseError,
    },
}

/// Top-level error type for the application crate.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Persisting or restoring the ledger failed.
    #[error("persistence error: {0}")]
    Persistence(#[from] SnapshotError),

    /// Bad configuration.
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// Transport-level failure.
    #[error("transport error: {0}")]
    Transport(#[from] std::io::Error),
}
