//! Block executor — the deterministic state transition over one block.
//!
//! `BlockExecutor::execute_block` runs the per-block lifecycle:
//!
//! 1. For each raw transaction, in the order given:
//!    a. Decode (failure → code 1)
//!    b. Apply (rejection → code 2)
//!    c. Record `code 0` on success
//! 2. Set the ledger height to the engine-supplied height
//! 3. Derive the application fingerprint from that height
//!
//! Order is significant: each transaction observes the effects of the ones
//! before it. Individual failures never abort the block and there is no
//! block-level rollback. No I/O happens here; persistence is the caller's job.

use layer0_primitives::{
    decode_transaction, types::app_hash, BlockHeight, BlockOutcome, Ledger, ResultCode, TxResult,
};

use crate::executor::apply_transaction;

/// The core block executor.
///
/// Stateless. All state lives in the `Ledger` passed in. Given the same
/// ledger and the same block it always produces the same outcome.
pub struct BlockExecutor;

impl BlockExecutor {
    /// Execute a full block against `ledger`.
    pub fn execute_block(
        ledger: &mut Ledger,
        height: BlockHeight,
        transactions: &[Vec<u8>],
    ) -> BlockOutcome {
        let mut outcome = BlockOutcome {
            height,
            tx_results: Vec::with_capacity(transactions.len()),
            app_hash: Vec::new(),
            burned: 0,
            to_treasury: 0,
        };

        for raw in transactions {
            let tx = match decode_transaction(raw) {
                Ok(tx) => tx,
                Err(err) => {
                    outcome
                        .tx_results
                        .push(TxResult::failure(ResultCode::DecodeFailed, err.to_string()));
                    continue;
                }
            };

            match apply_transaction(ledger, &tx) {
                Ok(split) => {
                    outcome.record_fee(split);
                    outcome.tx_results.push(TxResult::ok());
                }
                Err(err) => {
                    outcome
                        .tx_results
                        .push(TxResult::failure(ResultCode::Rejected, err.to_string()));
                }
            }
        }

        // The engine's height is authoritative; never incremented locally.
        ledger.set_height(height);
        outcome.app_hash = app_hash(height);
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use layer0_primitives::{encode_transaction, encode_transaction_base64, Amount, Transaction};

    fn transfer(from: &str, to: &str, amount: Amount, fee: Amount) -> Vec<u8> {
        encode_transaction(&Transaction::Transfer {
            from: from.into(),
            to: to.into(),
            amount,
            fee,
        })
    }

    // ── Test: empty block ──

    #[test]
    fn test_execute_empty_block() {
        let mut ledger = Ledger::genesis();
        let outcome = BlockExecutor::execute_block(&mut ledger, 1, &[]);

        assert!(outcome.tx_results.is_empty());
        assert_eq!(outcome.app_hash, b"h:1".to_vec());
        assert_eq!(ledger.height(), 1);
        assert_eq!(ledger.balance("alice"), 1_000_000);
    }

    // ── Test: mixed results keep their order ──

    #[test]
    fn test_mixed_results_in_order() {
        let mut ledger = Ledger::genesis();
        let txs = vec![
            transfer("alice", "bob", 100, 10),
            b"garbage".to_vec(),
            transfer("alice", "bob", 100, 0),
            encode_transaction_base64(&Transaction::Delegate {
                delegator: "alice".into(),
                validator: "v1".into(),
                amount: 500,
                fee: 5,
            }),
        ];
        let outcome = BlockExecutor::execute_block(&mut ledger, 7, &txs);

        let codes: Vec<u32> = outcome.tx_results.iter().map(|r| r.code).collect();
        assert_eq!(codes, vec![0, 1, 2, 0]);
        assert!(outcome.tx_results[0].log.is_empty());
        assert!(!outcome.tx_results[1].log.is_empty());
        assert!(outcome.tx_results[2].log.contains("fee too low"));
        assert_eq!(outcome.accepted(), 2);
        assert_eq!(outcome.burned, 10);
        assert_eq!(outcome.to_treasury, 5);
        assert_eq!(ledger.treasury(), 5);
        assert_eq!(ledger.balance("alice"), 999_385);
    }

    // ── Test: later txs see earlier effects ──

    #[test]
    fn test_order_sensitivity() {
        // carol starts empty; she can only pay bob after alice funds her.
        let fund = transfer("alice", "carol", 100, 1);
        let spend = transfer("carol", "bob", 50, 1);

        let mut forward = Ledger::genesis();
        let out = BlockExecutor::execute_block(&mut forward, 1, &[fund.clone(), spend.clone()]);
        assert!(out.tx_results.iter().all(|r| r.is_ok()));
        assert_eq!(forward.balance("carol"), 49);

        let mut reverse = Ledger::genesis();
        let out = BlockExecutor::execute_block(&mut reverse, 1, &[spend, fund]);
        assert_eq!(out.tx_results[0].code, 2);
        assert_eq!(out.tx_results[1].code, 0);
        assert_eq!(reverse.balance("carol"), 100);
    }

    // ── Test: height comes from the caller ──

    #[test]
    fn test_height_is_authoritative() {
        let mut ledger = Ledger::genesis();
        BlockExecutor::execute_block(&mut ledger, 10, &[]);
        assert_eq!(ledger.height(), 10);
        BlockExecutor::execute_block(&mut ledger, 42, &[]);
        assert_eq!(ledger.height(), 42);
    }

    #[test]
    fn test_failed_block_still_advances_height() {
        let mut ledger = Ledger::genesis();
        let out = BlockExecutor::execute_block(&mut ledger, 3, &[transfer("alice", "bob", 1, 0)]);
        assert_eq!(out.tx_results[0].code, 2);
        assert_eq!(ledger.height(), 3);
        assert_eq!(ledger.balance("alice"), 1_000_000);
    }

    // ── Test: determinism ──

    #[test]
    fn test_determinism_same_input_same_output() {
        let txs = vec![
            transfer("alice", "bob", 100, 10),
            transfer("bob", "carol", 2_000, 3),
            transfer("carol", "alice", 1_000, 2),
        ];

        let mut a = Ledger::genesis();
        let mut b = Ledger::genesis();
        let out_a = BlockExecutor::execute_block(&mut a, 1, &txs);
        let out_b = BlockExecutor::execute_block(&mut b, 1, &txs);

        assert_eq!(out_a, out_b);
        assert_eq!(a, b);
        assert_eq!(a.digest(), b.digest());
    }
}
