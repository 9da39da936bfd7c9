// Copyright (c) 2026 Vouch Foundation

//! Transaction pool for storing pending transactions and tracking which
//! transactions each known block included.

use std::collections::{HashMap, HashSet};
use thiserror::Error;
use tracing::debug;

use crate::{
    block::Block,
    transaction::{Tx, TxError},
};

/// Maximum transactions in the pool
const MAX_POOL_SIZE: usize = 10_000;

/// Where a transaction is known from, relative to a given chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FoundStatus {
    NotFound,
    /// Admitted to the pool but not in the given chain
    FoundPending,
    /// Included in the given block or one of its ancestors
    FoundChain,
}

/// Transaction source consumed by the producer and the verifier.
pub trait TxSource {
    /// Up to `limit` pending transactions in inclusion priority order.
    fn pending_txs(&self, limit: usize) -> Vec<Tx>;

    fn exist_txs(&self, tx_hash: &[u8; 32], parent: &Block) -> FoundStatus;
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TxPoolError {
    #[error("Transaction already in pool")]
    AlreadyExists,

    #[error("Invalid transaction: {0}")]
    Invalid(#[from] TxError),

    #[error("Negative gas price: {0}")]
    NegativeGasPrice(i64),

    #[error("Transaction pool is full")]
    Full,
}

#[derive(Debug, Clone)]
struct BlockTxs {
    parent: [u8; 32],
    txs: HashSet<[u8; 32]>,
}

#[derive(Debug, Default)]
pub struct TxPool {
    /// Pending transactions by hash
    pending: HashMap<[u8; 32], Tx>,
    /// Known blocks by head hash
    blocks: HashMap<[u8; 32], BlockTxs>,
}

impl TxPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Admit a transaction after checking its signatures.
    pub fn add_tx(&mut self, tx: Tx) -> Result<[u8; 32], TxPoolError> {
        let tx_hash = tx.hash();
        if self.pending.contains_key(&tx_hash) {
            return Err(TxPoolError::AlreadyExists);
        }
        if self.pending.len() >= MAX_POOL_SIZE {
            return Err(TxPoolError::Full);
        }
        if tx.gas_price < 0 {
            return Err(TxPoolError::NegativeGasPrice(tx.gas_price));
        }
        tx.verify_self()?;

        self.pending.insert(tx_hash, tx);
        debug!(tx = %hex::encode(&tx_hash[0..8]), "Added transaction to pool");
        Ok(tx_hash)
    }

    /// Index an accepted block and drop its transactions from the pending set.
    pub fn add_block(&mut self, block: &Block) {
        let mut parent = [0u8; 32];
        if block.head.parent_hash.len() == 32 {
            parent.copy_from_slice(&block.head.parent_hash);
        }

        let txs: HashSet<[u8; 32]> = block.txs.iter().map(Tx::hash).collect();
        for tx_hash in &txs {
            self.pending.remove(tx_hash);
        }
        self.blocks.insert(block.head_hash(), BlockTxs { parent, txs });
    }

    /// Evict pending transactions that expire at or before `now_nanos`.
    pub fn remove_expired(&mut self, now_nanos: i64) -> usize {
        let before = self.pending.len();
        self.pending.retain(|_, tx| tx.expiration > now_nanos);
        let removed = before - self.pending.len();
        if removed > 0 {
            debug!(removed, "Evicted expired transactions");
        }
        removed
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    fn in_chain(&self, tx_hash: &[u8; 32], head: [u8; 32]) -> bool {
        let mut cursor = Some(head);
        while let Some(hash) = cursor {
            match self.blocks.get(&hash) {
                Some(entry) => {
                    if entry.txs.contains(tx_hash) {
                        return true;
                    }
                    cursor = Some(entry.parent);
                }
                None => cursor = None,
            }
        }
        false
    }
}

impl TxSource for TxPool {
    fn pending_txs(&self, limit: usize) -> Vec<Tx> {
        let mut txs: Vec<(&[u8; 32], &Tx)> = self.pending.iter().collect();
        txs.sort_by(|(ha, a), (hb, b)| {
            b.gas_price
                .cmp(&a.gas_price)
                .then(a.time.cmp(&b.time))
                .then(ha.cmp(hb))
        });
        txs.into_iter().take(limit).map(|(_, tx)| tx.clone()).collect()
    }

    fn exist_txs(&self, tx_hash: &[u8; 32], parent: &Block) -> FoundStatus {
        if self.in_chain(tx_hash, parent.head_hash()) {
            FoundStatus::FoundChain
        } else if self.pending.contains_key(tx_hash) {
            FoundStatus::FoundPending
        } else {
            FoundStatus::NotFound
        }
    }
}
