// Copyright (c) 2026 Vouch Foundation

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::{
    merkle::TxReceiptMerkleTree,
    transaction::{Tx, TxReceipt},
};

/// Block header
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockHeader {
    /// Header format version
    pub version: u32,

    /// Head hash of the parent block
    pub parent_hash: Vec<u8>,

    /// Block number, parent number + 1
    pub number: u64,

    /// Account id of the producing witness
    pub witness: String,

    /// Slot the block was produced in (unix seconds / slot length)
    pub time: u64,

    /// Hash over the ordered transaction hashes
    pub txs_hash: Vec<u8>,

    /// Root of the receipts merkle tree
    pub merkle_hash: Vec<u8>,

    /// Encoded witness signature over [`BlockHeader::head_info`]
    pub signature: Vec<u8>,

    /// Opaque extra data, covered by the signature
    pub info: Vec<u8>,
}

impl BlockHeader {
    /// Digest the witness signs.
    ///
    /// Covers every field except the witness id and the signature itself;
    /// the witness is bound through the public key embedded in the signature.
    pub fn head_info(&self) -> [u8; 32] {
        let mut hasher = Sha256::new();
        hasher.update(self.time.to_be_bytes());
        hasher.update(self.version.to_be_bytes());
        hasher.update(self.number.to_be_bytes());
        hasher.update(&self.parent_hash);
        hasher.update(&self.txs_hash);
        hasher.update(&self.merkle_hash);
        hasher.update(&self.info);
        hasher.finalize().into()
    }

    /// Head hash, identifying the block once signed.
    pub fn hash(&self) -> [u8; 32] {
        let mut hasher = Sha256::new();
        hasher.update(self.head_info());
        hasher.update(self.witness.as_bytes());
        hasher.update(&self.signature);
        hasher.finalize().into()
    }
}

/// A block: header, transactions and their index-aligned receipts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    pub head: BlockHeader,
    pub txs: Vec<Tx>,
    pub receipts: Vec<TxReceipt>,
}

impl Block {
    /// Unsigned, empty block at number 0.
    pub fn genesis(witness: &str) -> Self {
        let mut block = Self {
            head: BlockHeader {
                version: 0,
                parent_hash: vec![0u8; 32],
                number: 0,
                witness: witness.to_string(),
                time: 0,
                txs_hash: Vec::new(),
                merkle_hash: Vec::new(),
                signature: Vec::new(),
                info: Vec::new(),
            },
            txs: Vec::new(),
            receipts: Vec::new(),
        };
        block.head.txs_hash = block.calculate_txs_hash();
        block.head.merkle_hash = block.calculate_merkle_hash();
        block
    }

    pub fn head_hash(&self) -> [u8; 32] {
        self.head.hash()
    }

    pub fn calculate_txs_hash(&self) -> Vec<u8> {
        let mut hasher = Sha256::new();
        for tx in &self.txs {
            hasher.update(tx.hash());
        }
        hasher.finalize().to_vec()
    }

    pub fn calculate_merkle_hash(&self) -> Vec<u8> {
        TxReceiptMerkleTree::build(&self.receipts).root_hash().to_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_head_info_ignores_signature() {
        let mut block = Block::genesis("w");
        let info = block.head.head_info();
        let hash = block.head_hash();

        block.head.signature = vec![1, 2, 3];
        assert_eq!(block.head.head_info(), info);
        assert_ne!(block.head_hash(), hash);
    }

    #[test]
    fn test_head_info_covers_number() {
        let block = Block::genesis("w");
        let mut next = block.clone();
        next.head.number = 1u64 << 32;
        assert_ne!(block.head.head_info(), next.head.head_info());
    }

    #[test]
    fn test_empty_block_hashes() {
        let block = Block::genesis("w");
        assert_eq!(block.head.merkle_hash, vec![0u8; 32]);
        assert_eq!(block.calculate_txs_hash(), Sha256::digest([]).to_vec());
    }
}
