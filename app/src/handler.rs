//! Protocol handler: the application state machine driven by consensus.
//!
//! [`App`] owns the one ledger of the process behind a single mutex. Every
//! lifecycle call holds that lock from start to finish, including the
//! snapshot write in `finalize_block`, so transactions observe strictly
//! sequential effects and no call ever sees a half-applied block.
//!
//! An `App` only exists after [`App::load_or_init`] succeeded, which is the
//! `Uninitialized → Ready` transition.

use layer0_engine::{check_transaction, BlockExecutor};
use layer0_primitives::{
    types::{app_hash, hash_to_hex},
    Ledger, APP_NAME, APP_VERSION,
};
use parking_lot::Mutex;
use tracing::{debug, error, info};

use crate::error::AppError;
use crate::protocol::{
    CheckTxRequest, CheckTxResponse, CommitResponse, ErrorResponse, FinalizeBlockRequest,
    FinalizeBlockResponse, InfoResponse, InitChainRequest, InitChainResponse, QueryRequest,
    QueryResponse, Request, Response, PATH_BALANCE, PATH_DELEGATION, PATH_PARAMS,
    PATH_TREASURY, QUERY_UNKNOWN_PATH,
};
use crate::snapshot::SnapshotStore;

/// The replicated application.
pub struct App {
    ledger: Mutex<Ledger>,
    store: SnapshotStore,
}

impl App {
    /// Restore the ledger from `store`, or initialize and persist genesis
    /// if there is no snapshot yet.
    ///
    /// A corrupt snapshot is an error; the ledger is never silently reset.
    pub fn load_or_init(store: SnapshotStore) -> Result<Self, AppError> {
        let ledger = match store.load()? {
            Some(ledger) => {
                info!(
                    path = %store.path().display(),
                    height = ledger.height(),
                    treasury = ledger.treasury(),
                    "restored ledger from snapshot"
                );
                ledger
            }
            None => {
                let ledger = Ledger::genesis();
                store.save(&ledger)?;
                info!(path = %store.path().display(), "initialized genesis ledger");
                ledger
            }
        };
        Ok(Self {
            ledger: Mutex::new(ledger),
            store,
        })
    }

    /// Clone of the current ledger.
    pub fn ledger(&self) -> Ledger {
        self.ledger.lock().clone()
    }

    /// Identity, last height and fingerprint. Read-only.
    pub fn info(&self) -> InfoResponse {
        let ledger = self.ledger.lock();
        InfoResponse {
            data: APP_NAME.to_string(),
            version: APP_VERSION.to_string(),
            last_block_height: ledger.height(),
            last_block_app_hash: app_hash(ledger.height()),
        }
    }

    /// Genesis hook. The ledger is not touched: genesis content is fixed by
    /// `load_or_init`, whatever the engine supplies here.
    pub fn init_chain(&self, request: &InitChainRequest) -> InitChainResponse {
        let _ledger = self.ledger.lock();
        info!(
            chain_id = %request.chain_id,
            initial_height = request.initial_height,
            validators = request.validators.len(),
            app_state_bytes = request.app_state_bytes.len(),
            "InitChain"
        );
        InitChainResponse {}
    }

    /// Mempool admission: decode and fee floor only. Never mutates.
    pub fn check_tx(&self, request: &CheckTxRequest) -> CheckTxResponse {
        let ledger = self.ledger.lock();
        let result = check_transaction(&ledger, &request.tx);
        if !result.is_ok() {
            debug!(code = result.code, log = %result.log, "CheckTx rejected");
        }
        result.into()
    }

    /// Execute a decided block and persist the resulting ledger.
    ///
    /// The block runs on a copy of the ledger. The copy replaces the live
    /// ledger only after the snapshot write succeeded; on a write failure
    /// the block is not acknowledged and the ledger stays at its
    /// pre-block state.
    pub fn finalize_block(
        &self,
        request: &FinalizeBlockRequest,
    ) -> Result<FinalizeBlockResponse, AppError> {
        let mut ledger = self.ledger.lock();
        let mut working = ledger.clone();
        let outcome = BlockExecutor::execute_block(&mut working, request.height, &request.txs);

        for (idx, result) in outcome.tx_results.iter().enumerate() {
            if !result.is_ok() {
                debug!(tx_index = idx, code = result.code, log = %result.log, "tx failed");
            }
        }

        if let Err(err) = self.store.save(&working) {
            error!(height = request.height, error = %err, "failed to persist block");
            return Err(err.into());
        }
        *ledger = working;

        info!(
            height = outcome.height,
            txs = outcome.tx_results.len(),
            accepted = outcome.accepted(),
            burned = outcome.burned,
            to_treasury = outcome.to_treasury,
            digest = %hash_to_hex(&ledger.digest()),
            "finalized block"
        );

        Ok(FinalizeBlockResponse {
            tx_results: outcome.tx_results,
            app_hash: outcome.app_hash,
        })
    }

    /// No-op: `finalize_block` has already persisted the block.
    pub fn commit(&self) -> CommitResponse {
        let _ledger = self.ledger.lock();
        CommitResponse { retain_height: 0 }
    }

    /// Read-only state queries.
    pub fn query(&self, request: &QueryRequest) -> QueryResponse {
        let ledger = self.ledger.lock();
        let ok = |value: String| QueryResponse {
            code: 0,
            log: String::new(),
            value: value.into_bytes(),
            height: ledger.height(),
        };

        match request.path.as_str() {
            PATH_BALANCE => {
                let account = String::from_utf8_lossy(&request.data);
                ok(ledger.balance(&account).to_string())
            }
            PATH_TREASURY => ok(ledger.treasury().to_string()),
            PATH_DELEGATION => {
                let key = String::from_utf8_lossy(&request.data);
                let (delegator, validator) = key.split_once('|').unwrap_or((&*key, ""));
                ok(ledger.delegation(delegator, validator).to_string())
            }
            // ChainParams holds three integers; serialization cannot fail.
            PATH_PARAMS => ok(serde_json::to_string(ledger.params()).unwrap_or_default()),
            _ => QueryResponse {
                code: QUERY_UNKNOWN_PATH,
                log: "unknown query path".to_string(),
                height: ledger.height(),
                ..QueryResponse::default()
            },
        }
    }

    /// Route one request to its lifecycle call.
    pub fn handle(&self, request: Request) -> Response {
        match request {
            Request::Info => Response::Info(self.info()),
            Request::InitChain(req) => Response::InitChain(self.init_chain(&req)),
            Request::CheckTx(req) => Response::CheckTx(self.check_tx(&req)),
            Request::FinalizeBlock(req) => match self.finalize_block(&req) {
                Ok(resp) => Response::FinalizeBlock(resp),
                Err(err) => Response::Error(ErrorResponse {
                    message: err.to_string(),
                }),
            },
            Request::Commit => Response::Commit(self.commit()),
            Request::Query(req) => Response::Query(self.query(&req)),
        }
    }
}
