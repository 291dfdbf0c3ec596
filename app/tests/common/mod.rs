//! Shared test helpers for integration tests.
//!
//! Transaction builders, request shorthands and an application factory
//! backed by a temporary snapshot directory.

#![allow(dead_code)]

use std::path::{Path, PathBuf};

use layer0_app::protocol::{
    CheckTxRequest, CheckTxResponse, FinalizeBlockRequest, FinalizeBlockResponse, QueryRequest,
};
use layer0_app::{App, SnapshotStore};
use layer0_primitives::{encode_transaction, encode_transaction_base64, Amount, Transaction};
use tempfile::TempDir;

/// Genesis balance of `alice` and `bob`.
pub const GENESIS: Amount = 1_000_000;

// ── Transaction Encoding ──

pub fn transfer(from: &str, to: &str, amount: Amount, fee: Amount) -> Vec<u8> {
    encode_transaction(&Transaction::Transfer {
        from: from.into(),
        to: to.into(),
        amount,
        fee,
    })
}

pub fn transfer_b64(from: &str, to: &str, amount: Amount, fee: Amount) -> Vec<u8> {
    encode_transaction_base64(&Transaction::Transfer {
        from: from.into(),
        to: to.into(),
        amount,
        fee,
    })
}

pub fn delegate(delegator: &str, validator: &str, amount: Amount, fee: Amount) -> Vec<u8> {
    encode_transaction(&Transaction::Delegate {
        delegator: delegator.into(),
        validator: validator.into(),
        amount,
        fee,
    })
}

// ── Application Factory ──

/// A live application and the directory holding its snapshot.
pub struct TestApp {
    pub dir: TempDir,
    pub app: App,
}

impl TestApp {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let app = open_app(&snapshot_path(dir.path()));
        Self { dir, app }
    }

    pub fn snapshot_path(&self) -> PathBuf {
        snapshot_path(self.dir.path())
    }

    /// Drop the running app and start a fresh one from the same snapshot.
    pub fn restart(self) -> Self {
        let TestApp { dir, app } = self;
        drop(app);
        let app = open_app(&snapshot_path(dir.path()));
        Self { dir, app }
    }
}

pub fn snapshot_path(dir: &Path) -> PathBuf {
    dir.join("state.json")
}

pub fn open_app(path: &Path) -> App {
    App::load_or_init(SnapshotStore::new(path).unwrap()).unwrap()
}

// ── Request Shorthands ──

pub fn check(app: &App, tx: Vec<u8>) -> CheckTxResponse {
    app.check_tx(&CheckTxRequest { tx })
}

pub fn finalize(app: &App, height: i64, txs: Vec<Vec<u8>>) -> FinalizeBlockResponse {
    app.finalize_block(&FinalizeBlockRequest { height, txs }).unwrap()
}

pub fn codes(resp: &FinalizeBlockResponse) -> Vec<u32> {
    resp.tx_results.iter().map(|r| r.code).collect()
}

/// Query `path` and parse the value as an integer.
pub fn query_amount(app: &App, path: &str, data: &str) -> Amount {
    let resp = app.query(&QueryRequest {
        path: path.into(),
        data: data.as_bytes().to_vec(),
    });
    assert_eq!(resp.code, 0, "query {} failed: {}", path, resp.log);
    String::from_utf8(resp.value).unwrap().parse().unwrap()
}
