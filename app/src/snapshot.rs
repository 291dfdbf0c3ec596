//! Durable on-disk mirror of the ledger.
//!
//! One pretty-printed JSON document holds the whole ledger:
//!
//! ```text
//! {
//!   "height": 12,
//!   "balances": { "alice": 999890, "bob": 1000100, "treasury": 3 },
//!   "delegations": [ { "delegator": "alice", "validator": "v1", "amount": 500 } ],
//!   "treasury": 3,
//!   "params": { "fee_base": 1, "fee_burn_bps": 7000, "fee_treasury_bps": 3000 }
//! }
//! ```
//!
//! `balances.treasury` mirrors the `treasury` counter. On load the two must
//! agree, otherwise the snapshot is rejected.
//!
//! Writes go to `<file>.tmp`, are fsynced, then renamed over the snapshot,
//! so a crash mid-write leaves the previous snapshot intact. The parent
//! directory is fsynced after the rename.

use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use layer0_primitives::{AccountId, Amount, BlockHeight, ChainParams, Ledger, TREASURY_ACCOUNT};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::SnapshotError;

/// Separator used by the legacy `delegates` map keys (`"delegator|validator"`).
const LEGACY_DELEGATION_SEPARATOR: char = '|';

/// One staked position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DelegationEntry {
    pub delegator: AccountId,
    pub validator: AccountId,
    pub amount: Amount,
}

/// On-disk snapshot document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedSnapshot {
    #[serde(default)]
    pub height: BlockHeight,
    #[serde(default)]
    pub balances: BTreeMap<AccountId, Amount>,
    #[serde(default)]
    pub delegations: Vec<DelegationEntry>,
    /// Legacy flat form of `delegations`. Read, never written.
    #[serde(default, skip_serializing)]
    pub delegates: BTreeMap<String, Amount>,
    #[serde(default)]
    pub treasury: Amount,
    #[serde(default)]
    pub params: ChainParams,
}

impl PersistedSnapshot {
    /// Capture `ledger`, writing the treasury mirror into `balances`.
    pub fn from_ledger(ledger: &Ledger) -> Self {
        let mut balances = ledger.balances().clone();
        balances.insert(TREASURY_ACCOUNT.to_string(), ledger.treasury());
        let delegations = ledger
            .delegations()
            .iter()
            .map(|((delegator, validator), amount)| DelegationEntry {
                delegator: delegator.clone(),
                validator: validator.clone(),
                amount: *amount,
            })
            .collect();
        Self {
            height: ledger.height(),
            balances,
            delegations,
            delegates: BTreeMap::new(),
            treasury: ledger.treasury(),
            params: *ledger.params(),
        }
    }

    /// Rebuild the ledger, reconciling the treasury mirror.
    pub fn into_ledger(self) -> Result<Ledger, SnapshotError> {
        let mut balances = self.balances;
        if let Some(mirrored) = balances.remove(TREASURY_ACCOUNT) {
            if mirrored != self.treasury {
                return Err(SnapshotError::TreasuryMismatch {
                    counter: self.treasury,
                    mirrored,
                });
            }
        }

        let mut delegations = BTreeMap::new();
        for entry in self.delegations {
            *delegations
                .entry((entry.delegator, entry.validator))
                .or_insert(0) += entry.amount;
        }
        for (key, amount) in self.delegates {
            let (delegator, validator) = key
                .split_once(LEGACY_DELEGATION_SEPARATOR)
                .unwrap_or((key.as_str(), ""));
            *delegations
                .entry((delegator.to_string(), validator.to_string()))
                .or_insert(0) += amount;
        }

        // A zero fee floor means the params block was never written.
        let params = if self.params.fee_base == 0 {
            ChainParams::default()
        } else {
            self.params
        };

        Ok(Ledger::from_parts(
            self.height,
            balances,
            delegations,
            self.treasury,
            params,
        )?)
    }
}

/// Snapshot file at a fixed path.
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    path: PathBuf,
}

impl SnapshotStore {
    /// Open a store at `path`, creating the parent directory if needed.
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, SnapshotError> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| SnapshotError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the ledger.
    ///
    /// Returns `Ok(None)` if the file is absent or empty. A non-empty file
    /// that does not parse or reconcile is an error, never a silent
    /// fallback to genesis.
    pub fn load(&self) -> Result<Option<Ledger>, SnapshotError> {
        let data = match fs::read(&self.path) {
            Ok(data) => data,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no snapshot found");
                return Ok(None);
            }
            Err(source) => {
                return Err(SnapshotError::Io {
                    path: self.path.clone(),
                    source,
                })
            }
        };
        if data.trim_ascii().is_empty() {
            warn!(path = %self.path.display(), "snapshot file is empty");
            return Ok(None);
        }

        let snapshot: PersistedSnapshot =
            serde_json::from_slice(&data).map_err(|source| SnapshotError::Corrupt {
                path: self.path.clone(),
                source,
            })?;
        snapshot.into_ledger().map(Some)
    }

    /// Atomically replace the snapshot with `ledger`.
    pub fn save(&self, ledger: &Ledger) -> Result<(), SnapshotError> {
        let data = serde_json::to_vec_pretty(&PersistedSnapshot::from_ledger(ledger))
            .map_err(SnapshotError::Encode)?;

        let tmp_path = self.tmp_path();
        let io_err = |path: &Path| {
            let path = path.to_path_buf();
            move |source| SnapshotError::Io { path, source }
        };

        let mut file = File::create(&tmp_path).map_err(io_err(&tmp_path))?;
        file.write_all(&data).map_err(io_err(&tmp_path))?;
        file.sync_all().map_err(io_err(&tmp_path))?;
        drop(file);
        fs::rename(&tmp_path, &self.path).map_err(io_err(&self.path))?;
        self.sync_dir()
    }

    /// Flush the directory entry so the rename itself is durable.
    #[cfg(unix)]
    fn sync_dir(&self) -> Result<(), SnapshotError> {
        let dir = self
            .path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        File::open(dir)
            .and_then(|d| d.sync_all())
            .map_err(|source| SnapshotError::Io {
                path: dir.to_path_buf(),
                source,
            })
    }

    #[cfg(not(unix))]
    fn sync_dir(&self) -> Result<(), SnapshotError> {
        Ok(())
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}
