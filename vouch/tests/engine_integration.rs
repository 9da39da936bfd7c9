// Copyright (c) 2026 Vouch Foundation
//
//! Host-backed engine integration tests.

mod common;

use assert_matches::assert_matches;
use std::sync::Arc;

use common::*;
use vch_vm_host::{Host, MemoryStateDb};
use vouch::{
    block::{Block, BlockHeader},
    engine::{EngineError, EngineFactory, HostEngineFactory, MIN_GAS_LIMIT},
    time::{current_slot, now_nanos},
    transaction::{Action, StatusCode, Tx},
};

fn factory() -> HostEngineFactory {
    HostEngineFactory::new(Arc::new(KvMonitor), SLOT_LENGTH)
}

fn header() -> BlockHeader {
    let mut head = Block::genesis("w").head;
    head.number = 1;
    head.time = current_slot(SLOT_LENGTH);
    head
}

fn fund(db: &mut MemoryStateDb, account: &str, amount: i64) {
    Host::new(db, Arc::new(KvMonitor))
        .teller()
        .deposit(account, amount)
        .unwrap();
}

fn balance(db: &mut MemoryStateDb, account: &str) -> i64 {
    let mut host = Host::new(db, Arc::new(KvMonitor));
    let balance = host.teller().balance(account).unwrap();
    balance
}

fn priced_tx(publisher: &vch_crypto_secp256k1::Keypair, gas_price: i64) -> Tx {
    let now = now_nanos();
    let mut tx = Tx::new(
        vec![Action::new("kv", "put", r#"["k","v"]"#)],
        vec![],
        10_000,
        gas_price,
        now,
        now + 60 * NANOS,
    );
    tx.publish(publisher).unwrap();
    tx
}

#[test]
fn successful_tx_records_every_action() {
    let mut db = MemoryStateDb::new();
    let publisher = keypair(9);
    let tx = signed_tx(
        &publisher,
        vec![
            Action::new("kv", "put", r#"["a","1"]"#),
            Action::new("kv", "noop", "[]"),
        ],
        10_000,
        now_nanos(),
    );

    let receipt = factory().bind(&header(), &mut db).exec(&tx).unwrap();

    assert_eq!(receipt.tx_hash, tx.hash());
    assert_eq!(receipt.status.code, StatusCode::Success);
    assert_eq!(receipt.success_action_count, 2);
    assert_eq!(receipt.receipts.len(), 2);
    assert_eq!(receipt.receipts[0].content, r#"["put","[\"a\",\"1\"]","success"]"#);
    assert!(receipt.gas_usage > 0);
}

#[test]
fn gas_limit_stops_remaining_actions() {
    let mut db = MemoryStateDb::new();
    let actions = (0..5)
        .map(|i| Action::new("kv", "put", &format!(r#"["key{}","value"]"#, i)))
        .collect();
    let tx = signed_tx(&keypair(9), actions, MIN_GAS_LIMIT, now_nanos());

    let receipt = factory().bind(&header(), &mut db).exec(&tx).unwrap();

    assert_eq!(receipt.status.code, StatusCode::GasRunOut);
    assert!(receipt.success_action_count < 5);
    assert!(receipt.gas_usage > MIN_GAS_LIMIT);
}

#[test]
fn publisher_pays_for_gas() {
    let mut db = MemoryStateDb::new();
    let publisher = keypair(9);
    fund(&mut db, &publisher.id(), 10_000);

    let receipt = factory()
        .bind(&header(), &mut db)
        .exec(&priced_tx(&publisher, 2))
        .unwrap();

    assert_eq!(receipt.status.code, StatusCode::Success);
    assert_eq!(balance(&mut db, &publisher.id()), 10_000 - 2 * receipt.gas_usage);
}

#[test]
fn unfunded_publisher_is_recorded_in_status() {
    let mut db = MemoryStateDb::new();
    let publisher = keypair(9);

    let receipt = factory()
        .bind(&header(), &mut db)
        .exec(&priced_tx(&publisher, 1))
        .unwrap();

    assert_eq!(receipt.status.code, StatusCode::BalanceNotEnough);
    assert_eq!(receipt.success_action_count, 1);
    assert_eq!(balance(&mut db, &publisher.id()), 0);
}

#[test]
fn negative_gas_price_cannot_credit_publisher() {
    let mut db = MemoryStateDb::new();
    let publisher = keypair(9);

    let result = factory()
        .bind(&header(), &mut db)
        .exec(&priced_tx(&publisher, -1000));

    assert_matches!(result, Err(EngineError::NegativeGasPrice(-1000)));
    assert_eq!(balance(&mut db, &publisher.id()), 0);
}

#[test]
fn overflowing_fee_is_unaffordable() {
    let mut db = MemoryStateDb::new();
    let publisher = keypair(9);
    fund(&mut db, &publisher.id(), 10_000);

    let receipt = factory()
        .bind(&header(), &mut db)
        .exec(&priced_tx(&publisher, i64::MAX))
        .unwrap();

    assert_eq!(receipt.status.code, StatusCode::BalanceNotEnough);
    assert_eq!(balance(&mut db, &publisher.id()), 10_000);
}

#[test]
fn execution_is_deterministic() {
    let publisher = keypair(9);
    let txs = vec![
        put_tx(&publisher, "a", "1"),
        signed_tx(&publisher, vec![Action::new("kv", "fail", "[]")], 10_000, now_nanos()),
        put_tx(&publisher, "b", "2"),
    ];
    let head = header();

    let run = |txs: &[Tx]| {
        let mut db = MemoryStateDb::new();
        let mut engine = factory().bind(&head, &mut db);
        let encoded: Vec<Vec<u8>> = txs
            .iter()
            .map(|tx| engine.exec(tx).unwrap().encode())
            .collect();
        encoded
    };

    assert_eq!(run(&txs), run(&txs));
}

#[test]
fn receipts_do_not_leak_between_txs() {
    let mut db = MemoryStateDb::new();
    let publisher = keypair(9);
    let head = header();
    let mut engine = factory().bind(&head, &mut db);

    let first = engine.exec(&put_tx(&publisher, "a", "1")).unwrap();
    let second = engine.exec(&put_tx(&publisher, "b", "2")).unwrap();

    assert_eq!(first.receipts.len(), 1);
    assert_eq!(second.receipts.len(), 1);
    assert!(second.receipts[0].content.contains("\\\"b\\\""));
}

#[test]
fn unrunnable_txs_are_errors() {
    let mut db = MemoryStateDb::new();
    let head = header();
    let mut engine = factory().bind(&head, &mut db);
    let publisher = keypair(9);

    let cheap = signed_tx(&publisher, vec![], MIN_GAS_LIMIT - 1, now_nanos());
    assert_matches!(engine.exec(&cheap), Err(EngineError::GasLimitTooLow(_)));

    let mut expired = Tx::new(vec![], vec![], 1_000, 0, 0, 1);
    expired.publish(&publisher).unwrap();
    assert_matches!(engine.exec(&expired), Err(EngineError::Expired { .. }));

    let now = now_nanos();
    let unpublished = Tx::new(vec![], vec![], 1_000, 0, now, now + 60 * NANOS);
    assert_matches!(engine.exec(&unpublished), Err(EngineError::NoPublisher));
}
