//! End-to-end ledger scenarios driven through the lifecycle calls.

mod common;

use layer0_primitives::TREASURY_ACCOUNT;

use common::*;

// ── Test: transfer settles fee ──

#[test]
fn test_transfer_with_fee_split() {
    let t = TestApp::new();
    let resp = finalize(&t.app, 1, vec![transfer("alice", "bob", 100, 10)]);

    assert_eq!(codes(&resp), vec![0]);
    assert_eq!(resp.app_hash, b"h:1".to_vec());

    let ledger = t.app.ledger();
    assert_eq!(ledger.balance("alice"), 999_890);
    assert_eq!(ledger.balance("bob"), 1_000_100);
    assert_eq!(ledger.treasury(), 3);
    assert_eq!(query_amount(&t.app, "/treasury", ""), 3);
    assert_eq!(query_amount(&t.app, "/balance", TREASURY_ACCOUNT), 3);
}

// ── Test: delegation after transfer ──

#[test]
fn test_delegate_after_transfer() {
    let t = TestApp::new();
    finalize(&t.app, 1, vec![transfer("alice", "bob", 100, 10)]);
    let resp = finalize(&t.app, 2, vec![delegate("alice", "v1", 500, 5)]);

    assert_eq!(codes(&resp), vec![0]);
    let ledger = t.app.ledger();
    assert_eq!(ledger.balance("alice"), 999_385);
    assert_eq!(ledger.delegation("alice", "v1"), 500);
    assert_eq!(ledger.treasury(), 5);
    assert_eq!(query_amount(&t.app, "/delegation", "alice|v1"), 500);
}

// ── Test: fee below floor ──

#[test]
fn test_fee_below_floor_rejected_everywhere() {
    let t = TestApp::new();
    let tx = transfer("alice", "bob", 100, 0);

    let checked = check(&t.app, tx.clone());
    assert_eq!(checked.code, 2);
    assert!(checked.log.contains("fee too low"), "log: {}", checked.log);
    assert_eq!(t.app.ledger().balance("alice"), GENESIS);

    let resp = finalize(&t.app, 1, vec![tx]);
    assert_eq!(codes(&resp), vec![2]);
    let ledger = t.app.ledger();
    assert_eq!(ledger.balance("alice"), GENESIS);
    assert_eq!(ledger.balance("bob"), GENESIS);
    assert_eq!(ledger.treasury(), 0);
    assert_eq!(ledger.height(), 1);
    assert_eq!(t.app.info().last_block_height, 1);
}

// ── Test: undecodable payload ──

#[test]
fn test_garbage_payload_is_decode_error() {
    let t = TestApp::new();
    let garbage = b"%%% not json, not base64 %%%".to_vec();

    assert_eq!(check(&t.app, garbage.clone()).code, 1);
    assert_eq!(check(&t.app, Vec::new()).code, 1);

    let resp = finalize(&t.app, 1, vec![garbage, Vec::new()]);
    assert_eq!(codes(&resp), vec![1, 1]);
    let ledger = t.app.ledger();
    assert_eq!(ledger.balance("alice"), GENESIS);
    assert_eq!(ledger.treasury(), 0);
}

// ── Test: base64-wrapped transactions ──

#[test]
fn test_base64_wrapped_transaction_executes() {
    let t = TestApp::new();
    let tx = transfer_b64("alice", "bob", 100, 10);
    assert_eq!(check(&t.app, tx.clone()).code, 0);

    let resp = finalize(&t.app, 1, vec![tx]);
    assert_eq!(codes(&resp), vec![0]);
    assert_eq!(t.app.ledger().balance("bob"), 1_000_100);
}

// ── Test: CheckTx never mutates ──

#[test]
fn test_check_tx_is_read_only() {
    let t = TestApp::new();
    let before = t.app.ledger();
    for tx in [
        transfer("alice", "bob", 100, 10),
        transfer("alice", "bob", 100, 0),
        delegate("alice", "v1", 5, 5),
        br#"{"type":"mint","fee":5}"#.to_vec(),
    ] {
        check(&t.app, tx);
    }
    assert_eq!(t.app.ledger(), before);
}

// ── Test: admission is fee-only ──

#[test]
fn test_check_tx_does_not_check_balance() {
    let t = TestApp::new();
    // Accepted by the mempool, rejected at execution.
    let tx = transfer("carol", "bob", 50, 1);
    assert_eq!(check(&t.app, tx.clone()).code, 0);
    let resp = finalize(&t.app, 1, vec![tx]);
    assert_eq!(codes(&resp), vec![2]);
    assert!(resp.tx_results[0].log.contains("insufficient balance"));
}

// ── Test: unknown transaction type ──

#[test]
fn test_unknown_type_rejected_at_execution() {
    let t = TestApp::new();
    let tx = br#"{"type":"mint","fee":5}"#.to_vec();
    assert_eq!(check(&t.app, tx.clone()).code, 0);

    let resp = finalize(&t.app, 1, vec![tx]);
    assert_eq!(codes(&resp), vec![2]);
    assert!(resp.tx_results[0].log.contains("unknown tx type"));
    assert_eq!(t.app.ledger().treasury(), 0);
}

// ── Test: exact balance boundary ──

#[test]
fn test_spending_entire_balance() {
    let t = TestApp::new();
    let resp = finalize(&t.app, 1, vec![transfer("alice", "bob", GENESIS - 10, 10)]);
    assert_eq!(codes(&resp), vec![0]);
    assert_eq!(t.app.ledger().balance("alice"), 0);

    let resp = finalize(&t.app, 2, vec![transfer("alice", "bob", 1, 1)]);
    assert_eq!(codes(&resp), vec![2]);
}

#[test]
fn test_one_over_balance_rejected() {
    let t = TestApp::new();
    let resp = finalize(&t.app, 1, vec![transfer("alice", "bob", GENESIS - 9, 10)]);
    assert_eq!(codes(&resp), vec![2]);
    assert_eq!(t.app.ledger().balance("alice"), GENESIS);
}

// ── Test: order within a block ──

#[test]
fn test_later_tx_sees_earlier_effects() {
    let t = TestApp::new();
    let resp = finalize(
        &t.app,
        1,
        vec![
            transfer("alice", "carol", 100, 1),
            transfer("carol", "dave", 99, 1),
            transfer("carol", "dave", 1, 1),
        ],
    );
    assert_eq!(codes(&resp), vec![0, 0, 2]);
    let ledger = t.app.ledger();
    assert_eq!(ledger.balance("carol"), 0);
    assert_eq!(ledger.balance("dave"), 99);
}

// ── Test: supply conservation ──

#[test]
fn test_supply_decreases_by_burned_fees_only() {
    let t = TestApp::new();
    let initial = t.app.ledger().total_supply();

    let blocks = vec![
        vec![transfer("alice", "bob", 100, 10), delegate("bob", "v1", 1_000, 5)],
        vec![transfer("bob", "alice", 7, 3), transfer("alice", "bob", 1, 0)],
        vec![b"junk".to_vec(), delegate("alice", "v2", 50, 100)],
    ];
    // 10 → 7, 5 → 3, 3 → 2, 100 → 70
    let burned: i128 = 7 + 3 + 2 + 70;

    for (i, txs) in blocks.into_iter().enumerate() {
        finalize(&t.app, i as i64 + 1, txs);
    }
    let ledger = t.app.ledger();
    assert_eq!(ledger.total_supply(), initial - burned);
    ledger.check_invariants().unwrap();
}

// ── Test: commit and query are side-effect free ──

#[test]
fn test_commit_does_not_change_state() {
    let t = TestApp::new();
    finalize(&t.app, 1, vec![transfer("alice", "bob", 100, 10)]);
    let before = t.app.ledger();
    assert_eq!(t.app.commit().retain_height, 0);
    assert_eq!(t.app.ledger(), before);
}

// ── Test: only JSON objects are transactions ──

#[test]
fn test_array_payloads_are_decode_errors() {
    let t = TestApp::new();
    let positional = br#"["transfer","alice","bob",100,"","",10]"#.to_vec();

    assert_eq!(check(&t.app, b"[]".to_vec()).code, 1);
    assert_eq!(check(&t.app, positional.clone()).code, 1);

    let resp = finalize(&t.app, 1, vec![positional, b"[]".to_vec()]);
    assert_eq!(codes(&resp), vec![1, 1]);
    assert_eq!(t.app.ledger().balance("bob"), GENESIS);
}

// ── Test: repeated key keeps the last value ──

#[test]
fn test_duplicate_fee_key_uses_last_value() {
    let t = TestApp::new();
    let tx = br#"{"type":"transfer","from":"alice","to":"bob","amount":100,"fee":1,"fee":10}"#.to_vec();
    assert_eq!(check(&t.app, tx.clone()).code, 0);

    let resp = finalize(&t.app, 1, vec![tx]);
    assert_eq!(codes(&resp), vec![0]);
    assert_eq!(t.app.ledger().balance("alice"), 999_890);
    assert_eq!(t.app.ledger().treasury(), 3);
}
