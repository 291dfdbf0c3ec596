//! Application configuration.
//!
//! Values come from the environment, falling back to defaults:
//!
//! | Variable          | Default           |
//! |-------------------|-------------------|
//! | `APP_SNAPSHOT`    | `./state.json`    |
//! | `APP_LISTEN_ADDR` | `0.0.0.0:27158`   |
//!
//! Log filtering is controlled separately through `RUST_LOG`.

use std::net::SocketAddr;
use std::path::PathBuf;

use crate::error::ConfigError;

/// Environment variable overriding the snapshot path.
pub const ENV_SNAPSHOT: &str = "APP_SNAPSHOT";

/// Environment variable overriding the listen address.
pub const ENV_LISTEN_ADDR: &str = "APP_LISTEN_ADDR";

/// Default snapshot location.
pub const DEFAULT_SNAPSHOT_PATH: &str = "./state.json";

/// Default address the consensus engine connects to.
pub const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:27158";

/// Runtime configuration for the application process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Path of the ledger snapshot document.
    pub snapshot_path: PathBuf,
    /// TCP address the transport listens on.
    pub listen_addr: SocketAddr,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            snapshot_path: PathBuf::from(DEFAULT_SNAPSHOT_PATH),
            listen_addr: SocketAddr::from(([0, 0, 0, 0], 27158)),
        }
    }
}

impl AppConfig {
    /// Resolve configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolve configuration from an arbitrary key lookup.
    ///
    /// Empty values are treated as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut config = Self::default();

        if let Some(path) = get(ENV_SNAPSHOT) {
            config.snapshot_path = PathBuf::from(path);
        }
        if let Some(addr) = get(ENV_LISTEN_ADDR) {
            config.listen_addr = addr
                .trim()
                .parse()
                .map_err(|source| ConfigError::ListenAddr {
                    value: addr.clone(),
                    source,
                })?;
        }
        Ok(config)
    }
}
