// Copyright (c) 2026 Vouch Foundation

//! A witness node: schedule, consensus state, transaction pool, producer,
//! verifier and receipt store wired together from a [`Config`].
//!
//! The node owns the fork tree down to the last irreversible block. Blocks
//! are accepted through [`Node::add_block`], which verifies them, stores
//! their receipt merkle tree, records their consensus metadata and moves
//! the irreversible block forward.

use anyhow::{anyhow, Context, Result};
use std::sync::Arc;
use tracing::info;
use vch_crypto_secp256k1::Keypair;
use vch_vm_host::{Monitor, StateDb};

use crate::{
    block::Block,
    blockcache::BlockCacheNode,
    config::Config,
    consensus::{
        calculate_confirm, BlockProducer, BlockVerifier, ConsensusError, ConsensusState, Deadline,
        RoundRobinSchedule,
    },
    engine::{EngineFactory, HostEngineFactory},
    merkle::{MerkleDbError, MerkleTreeDb, TxReceiptMerkleTree},
    metrics::init_metrics,
    transaction::Tx,
    txpool::{TxPool, TxPoolError},
};

pub struct Node {
    config: Config,
    schedule: RoundRobinSchedule,
    state: ConsensusState,
    pool: TxPool,
    producer: BlockProducer,
    verifier: BlockVerifier,
    receipts: MerkleTreeDb,
    genesis: Arc<BlockCacheNode>,
    /// Last irreversible block
    lib: Arc<BlockCacheNode>,
}

impl Node {
    /// Build a node whose genesis block is witnessed by the first configured
    /// witness, opening the receipt store under the data directory.
    pub fn new(config: Config, monitor: Arc<dyn Monitor>) -> Result<Self> {
        config.validate()?;
        let witnesses = config.consensus.witnesses.clone();
        let first = witnesses
            .first()
            .ok_or_else(|| anyhow!("consensus.witnesses must name at least one witness"))?;

        let receipts_path = config.storage.merkle_db_path();
        let receipts = MerkleTreeDb::open(&receipts_path).with_context(|| {
            format!("Failed to open receipt store at {}", receipts_path.display())
        })?;
        init_metrics();

        let consensus = &config.consensus;
        let engines: Arc<dyn EngineFactory> =
            Arc::new(HostEngineFactory::new(monitor, consensus.slot_length_secs));
        let genesis = Arc::new(BlockCacheNode::root(
            Block::genesis(first),
            witnesses.clone(),
        ));

        info!(
            witnesses = witnesses.len(),
            data_dir = %config.storage.data_dir.display(),
            "Node initialized"
        );

        Ok(Self {
            schedule: RoundRobinSchedule::new(witnesses.clone()),
            state: ConsensusState::new(witnesses.len()),
            pool: TxPool::new(),
            producer: BlockProducer::new(
                Arc::clone(&engines),
                consensus.slot_length_secs,
                consensus.tx_per_block,
            ),
            verifier: BlockVerifier::new(
                engines,
                consensus.slot_length_secs,
                consensus.max_tx_age_secs,
            ),
            receipts,
            lib: Arc::clone(&genesis),
            genesis,
            config,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn genesis(&self) -> &Arc<BlockCacheNode> {
        &self.genesis
    }

    /// Last irreversible block.
    pub fn lib(&self) -> &Arc<BlockCacheNode> {
        &self.lib
    }

    pub fn state(&self) -> &ConsensusState {
        &self.state
    }

    pub fn submit_transaction(&mut self, tx: Tx) -> Result<[u8; 32], TxPoolError> {
        self.pool.add_tx(tx)
    }

    pub fn pending_tx_count(&self) -> usize {
        self.pool.len()
    }

    /// Produce a block on `parent` for the current slot.
    pub fn produce(
        &self,
        account: &Keypair,
        parent: &BlockCacheNode,
        db: &mut dyn StateDb,
    ) -> Result<Block, ConsensusError> {
        self.producer.produce(account, parent, &self.pool, db)
    }

    /// Produce a block on `parent` for `slot`, bounded by `deadline`.
    pub fn produce_for_slot(
        &self,
        account: &Keypair,
        parent: &BlockCacheNode,
        db: &mut dyn StateDb,
        slot: u64,
        deadline: &dyn Deadline,
    ) -> Result<Block, ConsensusError> {
        self.producer
            .produce_with(account, parent, &self.pool, db, slot, deadline)
    }

    /// Verify `block` against `parent` and accept it into the fork tree.
    ///
    /// `db` is the state after `parent`; on success it holds the state after
    /// `block`, tagged with the block's hex head hash. A rejected block
    /// leaves no trace in the receipt store, the pool or the consensus state.
    pub fn add_block(
        &mut self,
        block: Block,
        parent: &Arc<BlockCacheNode>,
        db: &mut dyn StateDb,
    ) -> Result<Arc<BlockCacheNode>> {
        self.verifier.verify(
            &block,
            &parent.block,
            &self.lib.block,
            &self.schedule,
            &self.state,
            &self.pool,
            db,
        )?;

        let hash = block.head_hash();
        db.tag(&hex::encode(hash));
        self.receipts
            .put(&TxReceiptMerkleTree::build(&block.receipts), block.head.number)
            .with_context(|| format!("Failed to store receipts of block {}", block.head.number))?;
        self.pool.add_block(&block);

        let mut node = BlockCacheNode::new(block, Some(Arc::clone(parent)));
        self.state.record_acceptance(&mut node);
        self.state.update_pending_witness(&mut node, None);
        let node = Arc::new(node);

        info!(
            number = node.number,
            witness = %node.witness,
            hash = %hex::encode(&hash[0..8]),
            "Accepted block"
        );

        if let Some(lib) = calculate_confirm(&self.state, &node, &self.lib) {
            self.state.prune_slots(lib.block.head.time);
            self.lib = lib;
        }
        Ok(node)
    }

    /// Receipt merkle tree of the accepted block numbered `number`.
    pub fn receipt_tree(&self, number: u64) -> Result<TxReceiptMerkleTree, MerkleDbError> {
        self.receipts.get(number)
    }
}
