// Copyright (c) 2026 Vouch Foundation

//! Receipt merkle trees and their per-block persistence.

mod store;
mod tree;

pub use store::MerkleTreeDb;
pub use tree::{verify_proof, ProofStep, TxReceiptMerkleTree};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum MerkleDbError {
    #[error("Database error: {0}")]
    Database(#[from] lmdb::Error),

    #[error("I/O error: {0}")]
    Io(String),

    #[error("Failed to encode merkle tree: {0}")]
    Encode(String),

    #[error("Failed to decode merkle tree: {0}")]
    Decode(String),

    #[error("No merkle tree stored for block {0}")]
    NotFound(u64),
}
