// Copyright (c) 2026 Vouch Foundation

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;

use super::MerkleDbError;
use crate::transaction::TxReceipt;

/// One step of an inclusion proof: the sibling hash and whether it sits to
/// the left of the running hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProofStep {
    pub sibling: [u8; 32],
    pub sibling_is_left: bool,
}

/// Merkle tree over a block's transaction receipts.
///
/// Leaves are SHA-256 of each receipt's canonical encoding in block order.
/// A level with an odd number of nodes pairs its last node with itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxReceiptMerkleTree {
    /// `levels[0]` holds the leaves; the last level holds the root
    levels: Vec<Vec<[u8; 32]>>,
    receipts: Vec<TxReceipt>,
    /// hex tx hash -> leaf index
    tx_index: BTreeMap<String, usize>,
}

impl TxReceiptMerkleTree {
    pub fn build(receipts: &[TxReceipt]) -> Self {
        let leaves: Vec<[u8; 32]> = receipts.iter().map(TxReceipt::hash).collect();
        let tx_index = receipts
            .iter()
            .enumerate()
            .map(|(i, r)| (hex::encode(r.tx_hash), i))
            .collect();

        let mut levels = vec![leaves];
        while levels[levels.len() - 1].len() > 1 {
            let next = levels[levels.len() - 1]
                .chunks(2)
                .map(|pair| hash_pair(&pair[0], pair.get(1).unwrap_or(&pair[0])))
                .collect();
            levels.push(next);
        }

        Self {
            levels,
            receipts: receipts.to_vec(),
            tx_index,
        }
    }

    /// Root hash; 32 zero bytes for an empty tree.
    pub fn root_hash(&self) -> [u8; 32] {
        self.levels
            .last()
            .and_then(|level| level.first())
            .copied()
            .unwrap_or([0u8; 32])
    }

    pub fn len(&self) -> usize {
        self.receipts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.receipts.is_empty()
    }

    /// Receipt of the transaction with the given hash.
    pub fn receipt(&self, tx_hash: &[u8]) -> Option<&TxReceipt> {
        self.tx_index
            .get(&hex::encode(tx_hash))
            .and_then(|&i| self.receipts.get(i))
    }

    /// Inclusion path for the receipt of `tx_hash`, leaf to root.
    pub fn proof(&self, tx_hash: &[u8]) -> Option<Vec<ProofStep>> {
        let mut index = *self.tx_index.get(&hex::encode(tx_hash))?;
        let mut path = Vec::new();
        for level in &self.levels[..self.levels.len() - 1] {
            let sibling_index = if index % 2 == 0 { index + 1 } else { index - 1 };
            let sibling = level.get(sibling_index).unwrap_or(&level[index]);
            path.push(ProofStep {
                sibling: *sibling,
                sibling_is_left: index % 2 == 1,
            });
            index /= 2;
        }
        Some(path)
    }

    pub fn encode(&self) -> Result<Vec<u8>, MerkleDbError> {
        bincode::serialize(self).map_err(|e| MerkleDbError::Encode(e.to_string()))
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, MerkleDbError> {
        bincode::deserialize(bytes).map_err(|e| MerkleDbError::Decode(e.to_string()))
    }
}

/// Check that `receipt` is included under `root` via `proof`.
pub fn verify_proof(receipt: &TxReceipt, proof: &[ProofStep], root: &[u8; 32]) -> bool {
    let hash = proof.iter().fold(receipt.hash(), |acc, step| {
        if step.sibling_is_left {
            hash_pair(&step.sibling, &acc)
        } else {
            hash_pair(&acc, &step.sibling)
        }
    });
    &hash == root
}

fn hash_pair(left: &[u8; 32], right: &[u8; 32]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(left);
    hasher.update(right);
    hasher.finalize().into()
}
