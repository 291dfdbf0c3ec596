//! `layer0-app` — the Layer0 hub chain application process.
//!
//! Wires the deterministic engine to a consensus engine:
//!
//! - [`handler::App`] — the six lifecycle calls over one mutex-guarded ledger
//! - [`snapshot::SnapshotStore`] — atomic JSON snapshot of the ledger
//! - [`protocol`] — request/response types and their JSON wire form
//! - [`server`] — newline-delimited JSON over TCP
//! - [`config::AppConfig`] — environment-driven configuration

pub mod error;
pub mod config;
pub mod snapshot;
pub mod protocol;
pub mod handler;
pub mod server;

pub use config::AppConfig;
pub use error::{AppError, ConfigError, SnapshotError};
pub use handler::App;
pub use protocol::{Request, Response};
pub use snapshot::SnapshotStore;
