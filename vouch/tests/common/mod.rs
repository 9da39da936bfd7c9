// Copyright (c) 2026 Vouch Foundation
//
//! Common test utilities for consensus integration tests.
//!
//! [`TestChain`] wires a witness set, a transaction pool, an in-memory state
//! store and a host-backed engine together, so tests only describe blocks
//! and transactions.

#![allow(dead_code)]

use serde_json::{json, Value};
use std::{cell::Cell, sync::Arc};

use vch_crypto_secp256k1::Keypair;
use vch_vm_host::{Contract, Cost, Host, HostError, MemoryStateDb, Metered, Monitor};
use vouch::{
    block::Block,
    blockcache::BlockCacheNode,
    consensus::{BlockProducer, BlockVerifier, ConsensusState, Deadline, RoundRobinSchedule},
    engine::{EngineFactory, HostEngineFactory},
    time::{current_slot, now_nanos},
    transaction::{Action, Tx},
    txpool::TxPool,
};

pub const SLOT_LENGTH: u64 = 3;
pub const TX_PER_BLOCK: usize = 1000;
pub const MAX_TX_AGE_SECS: i64 = 60;
pub const NANOS: i64 = 1_000_000_000;

/// Cost of running any entry point of [`KvMonitor`].
pub const STEP_COST: Cost = Cost::new(0, 5, 0);

/// Minimal VM: `put(["key", "value"])` writes contract storage, `fail`
/// errors, anything else returns nothing.
pub struct KvMonitor;

impl Monitor for KvMonitor {
    fn call(&self, host: &mut Host<'_>, _contract: &str, api: &str, args: &str) -> Metered<Vec<Value>> {
        match api {
            "put" => {
                let parsed: Vec<String> = match serde_json::from_str(args) {
                    Ok(parsed) => parsed,
                    Err(e) => return (Err(HostError::Serialization(e.to_string())), STEP_COST),
                };
                if parsed.len() != 2 {
                    return (
                        Err(HostError::Serialization("put takes key and value".into())),
                        STEP_COST,
                    );
                }
                let (result, cost) = host.db_handler().put(&parsed[0], &parsed[1]);
                (result.map(|_| vec![json!("ok")]), cost + STEP_COST)
            }
            "fail" => (Err(HostError::Monitor("boom".into())), STEP_COST),
            _ => (Ok(vec![]), STEP_COST),
        }
    }

    fn compile(&self, contract: &Contract) -> Result<String, HostError> {
        Ok(contract.code.clone())
    }
}

/// Deadline that expires after it has been polled `allowed` times.
pub struct AfterPolls {
    allowed: usize,
    polls: Cell<usize>,
}

impl AfterPolls {
    pub fn new(allowed: usize) -> Self {
        Self {
            allowed,
            polls: Cell::new(0),
        }
    }
}

impl Deadline for AfterPolls {
    fn expired(&self) -> bool {
        let polls = self.polls.get() + 1;
        self.polls.set(polls);
        polls > self.allowed
    }
}

pub struct NoDeadline;

impl Deadline for NoDeadline {
    fn expired(&self) -> bool {
        false
    }
}

pub fn keypair(seed: u8) -> Keypair {
    Keypair::from_bytes(&[seed; 32]).unwrap()
}

/// A published transaction storing `key = value` in contract `kv`.
pub fn put_tx(publisher: &Keypair, key: &str, value: &str) -> Tx {
    signed_tx(
        publisher,
        vec![Action::new("kv", "put", &json!([key, value]).to_string())],
        10_000,
        now_nanos(),
    )
}

pub fn signed_tx(publisher: &Keypair, actions: Vec<Action>, gas_limit: i64, time: i64) -> Tx {
    let mut tx = Tx::new(actions, vec![], gas_limit, 0, time, time + 60 * NANOS);
    tx.publish(publisher).unwrap();
    tx
}

pub struct TestChain {
    pub witnesses: Vec<Keypair>,
    pub schedule: RoundRobinSchedule,
    pub state: ConsensusState,
    pub pool: TxPool,
    pub db: MemoryStateDb,
    pub engines: Arc<dyn EngineFactory>,
    pub producer: BlockProducer,
    pub verifier: BlockVerifier,
    pub genesis: Arc<BlockCacheNode>,
}

impl TestChain {
    pub fn new(witness_count: u8) -> Self {
        let witnesses: Vec<Keypair> = (1..=witness_count).map(keypair).collect();
        let ids: Vec<String> = witnesses.iter().map(Keypair::id).collect();
        let engines: Arc<dyn EngineFactory> =
            Arc::new(HostEngineFactory::new(Arc::new(KvMonitor), SLOT_LENGTH));

        Self {
            schedule: RoundRobinSchedule::new(ids.clone()),
            state: ConsensusState::new(ids.len()),
            pool: TxPool::new(),
            db: MemoryStateDb::new(),
            producer: BlockProducer::new(Arc::clone(&engines), SLOT_LENGTH, TX_PER_BLOCK),
            verifier: BlockVerifier::new(Arc::clone(&engines), SLOT_LENGTH, MAX_TX_AGE_SECS),
            genesis: Arc::new(BlockCacheNode::root(Block::genesis(&ids[0]), ids)),
            engines,
            witnesses,
        }
    }

    /// Keypair of the witness scheduled for `slot`.
    pub fn scheduled(&self, slot: u64) -> &Keypair {
        &self.witnesses[(slot % self.witnesses.len() as u64) as usize]
    }

    pub fn slot(&self) -> u64 {
        current_slot(SLOT_LENGTH)
    }

    /// Produce on `parent` for `slot` as the scheduled witness, against a
    /// copy of the current state.
    pub fn produce(&self, parent: &BlockCacheNode, slot: u64, deadline: &dyn Deadline) -> Block {
        let mut snapshot = self.db.clone();
        self.producer
            .produce_with(self.scheduled(slot), parent, &self.pool, &mut snapshot, slot, deadline)
            .unwrap()
    }

    /// Accept `block` on top of `parent`, returning its cache node.
    pub fn accept(&mut self, block: Block, parent: &Arc<BlockCacheNode>) -> Arc<BlockCacheNode> {
        self.pool.add_block(&block);
        let mut node = BlockCacheNode::new(block, Some(Arc::clone(parent)));
        self.state.record_acceptance(&mut node);
        self.state.update_pending_witness(&mut node, None);
        Arc::new(node)
    }
}

/// A synthetic accepted node, for finality tests that need no real blocks.
pub fn cache_node(
    parent: Option<Arc<BlockCacheNode>>,
    number: u64,
    witness: &str,
    confirm_until: u64,
) -> Arc<BlockCacheNode> {
    let mut block = Block::genesis(witness);
    block.head.number = number;
    let mut node = BlockCacheNode::new(block, parent);
    node.number = number;
    node.witness = witness.to_string();
    node.confirm_until = confirm_until;
    Arc::new(node)
}
