// Copyright (c) 2026 Vouch Foundation

use thiserror::Error;

use crate::engine::EngineError;

/// Reasons a block is rejected or cannot be produced.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConsensusError {
    // Basics
    #[error("Wrong witness")]
    WrongWitness,
    #[error("Wrong pubkey")]
    WrongPubkey,
    #[error("Wrong signature")]
    WrongSignature,
    #[error("Witness slot duplicate")]
    DuplicateSlotWitness,

    // Transactions
    #[error("Tx too old")]
    TxTooOld,
    #[error("Duplicate tx")]
    DuplicateTx,
    #[error("Tx wrong signature")]
    TxWrongSignature,

    // Header
    #[error("Block from future")]
    FutureBlock,
    #[error("Block too old")]
    TooOldBlock,
    #[error("Wrong parent hash")]
    WrongParentHash,
    #[error("Wrong number")]
    WrongNumber,
    #[error("Wrong txs hash")]
    WrongTxsHash,
    #[error("Wrong tx receipt merkle hash")]
    WrongMerkleHash,

    // Re-execution
    #[error("Wrong tx receipt")]
    WrongTxReceipt,
    #[error("Execution failed: {0}")]
    Engine(#[from] EngineError),

    #[error("Signing failed: {0}")]
    Signing(String),
}

impl ConsensusError {
    /// Short label for metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::WrongWitness => "wrong_witness",
            Self::WrongPubkey => "wrong_pubkey",
            Self::WrongSignature => "wrong_signature",
            Self::DuplicateSlotWitness => "duplicate_slot_witness",
            Self::TxTooOld => "tx_too_old",
            Self::DuplicateTx => "duplicate_tx",
            Self::TxWrongSignature => "tx_wrong_signature",
            Self::FutureBlock => "future_block",
            Self::TooOldBlock => "too_old_block",
            Self::WrongParentHash => "wrong_parent_hash",
            Self::WrongNumber => "wrong_number",
            Self::WrongTxsHash => "wrong_txs_hash",
            Self::WrongMerkleHash => "wrong_merkle_hash",
            Self::WrongTxReceipt => "wrong_tx_receipt",
            Self::Engine(_) => "engine",
            Self::Signing(_) => "signing",
        }
    }
}
