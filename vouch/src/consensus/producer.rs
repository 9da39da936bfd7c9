// Copyright (c) 2026 Vouch Foundation

//! Block production for the witness scheduled in the current slot.

use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info};
use vch_crypto_secp256k1::Keypair;
use vch_vm_host::StateDb;

use super::ConsensusError;
use crate::{
    block::{Block, BlockHeader},
    blockcache::BlockCacheNode,
    engine::EngineFactory,
    metrics::{GENERATED_BLOCKS, TX_POOL_SIZE},
    time::current_slot,
    txpool::TxSource,
};

/// Soft time budget, polled between transactions.
pub trait Deadline {
    fn expired(&self) -> bool;
}

/// One third of a slot, starting now.
pub struct SlotDeadline {
    until: Instant,
}

impl SlotDeadline {
    pub fn new(slot_length_secs: u64) -> Self {
        Self {
            until: Instant::now() + Duration::from_secs(slot_length_secs) / 3,
        }
    }
}

impl Deadline for SlotDeadline {
    fn expired(&self) -> bool {
        Instant::now() >= self.until
    }
}

pub struct BlockProducer {
    engines: Arc<dyn EngineFactory>,
    slot_length: u64,
    tx_per_block: usize,
}

impl BlockProducer {
    pub fn new(engines: Arc<dyn EngineFactory>, slot_length: u64, tx_per_block: usize) -> Self {
        Self {
            engines,
            slot_length,
            tx_per_block,
        }
    }

    /// Build, sign and return a block on top of `parent` for the current slot.
    pub fn produce(
        &self,
        account: &Keypair,
        parent: &BlockCacheNode,
        txs: &dyn TxSource,
        db: &mut dyn StateDb,
    ) -> Result<Block, ConsensusError> {
        let deadline = SlotDeadline::new(self.slot_length);
        self.produce_with(account, parent, txs, db, current_slot(self.slot_length), &deadline)
    }

    /// Build a block for `slot`, including pending transactions until
    /// `deadline` expires.
    ///
    /// Inclusion is best effort: a transaction the engine refuses to execute
    /// is left out of the block without failing production. Once the
    /// deadline has passed no further transaction is attempted.
    pub fn produce_with(
        &self,
        account: &Keypair,
        parent: &BlockCacheNode,
        txs: &dyn TxSource,
        db: &mut dyn StateDb,
        slot: u64,
        deadline: &dyn Deadline,
    ) -> Result<Block, ConsensusError> {
        let parent_block = &parent.block;
        let mut block = Block {
            head: BlockHeader {
                version: 0,
                parent_hash: parent_block.head_hash().to_vec(),
                number: parent_block.head.number + 1,
                witness: account.id(),
                time: slot,
                txs_hash: Vec::new(),
                merkle_hash: Vec::new(),
                signature: Vec::new(),
                info: Vec::new(),
            },
            txs: Vec::new(),
            receipts: Vec::new(),
        };

        let pending = txs.pending_txs(self.tx_per_block);
        TX_POOL_SIZE.set(pending.len() as i64);

        {
            let mut engine = self.engines.bind(&block.head, &mut *db);
            for tx in pending {
                if deadline.expired() {
                    debug!(
                        number = block.head.number,
                        included = block.txs.len(),
                        "Production deadline reached"
                    );
                    break;
                }
                match engine.exec(&tx) {
                    Ok(receipt) => {
                        block.txs.push(tx);
                        block.receipts.push(receipt);
                    }
                    Err(e) => {
                        debug!(tx = %hex::encode(&tx.hash()[0..8]), error = %e, "Dropping transaction");
                    }
                }
            }
        }

        block.head.txs_hash = block.calculate_txs_hash();
        block.head.merkle_hash = block.calculate_merkle_hash();
        let signature = account
            .sign(&block.head.head_info())
            .map_err(|e| ConsensusError::Signing(e.to_string()))?;
        block.head.signature = signature
            .encode()
            .map_err(|e| ConsensusError::Signing(e.to_string()))?;

        let hash = block.head_hash();
        db.tag(&hex::encode(hash));
        GENERATED_BLOCKS.inc();

        info!(
            number = block.head.number,
            slot,
            txs = block.txs.len(),
            hash = %hex::encode(&hash[0..8]),
            "Produced block"
        );
        Ok(block)
    }
}
