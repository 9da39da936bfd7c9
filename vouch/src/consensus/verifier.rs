// Copyright (c) 2026 Vouch Foundation

//! Validation of blocks received from other witnesses.
//!
//! A block passes only if the header links to its parent, the witness
//! scheduled for the slot signed it, every transaction is fresh and
//! correctly signed, and re-executing the transactions here reproduces
//! byte-identical receipts.

use std::sync::Arc;
use tracing::{debug, warn};
use vch_crypto_secp256k1::{account_id_from_pubkey, verify, Signature};
use vch_vm_host::StateDb;

use super::{ConsensusError, ConsensusState, WitnessSchedule};
use crate::{
    block::Block,
    engine::EngineFactory,
    metrics::VERIFY_FAILURES,
    time::now_secs,
    txpool::{FoundStatus, TxSource},
};

pub struct BlockVerifier {
    engines: Arc<dyn EngineFactory>,
    slot_length: u64,
    max_tx_age_secs: i64,
}

impl BlockVerifier {
    pub fn new(engines: Arc<dyn EngineFactory>, slot_length: u64, max_tx_age_secs: i64) -> Self {
        Self {
            engines,
            slot_length,
            max_tx_age_secs,
        }
    }

    /// Run every check: header, basics, transactions, then re-execution.
    #[allow(clippy::too_many_arguments)]
    pub fn verify(
        &self,
        block: &Block,
        parent: &Block,
        lib: &Block,
        schedule: &dyn WitnessSchedule,
        state: &ConsensusState,
        txs: &dyn TxSource,
        db: &mut dyn StateDb,
    ) -> Result<(), ConsensusError> {
        self.verify_block_head(block, parent, lib, now_secs())
            .and_then(|_| self.verify_basics(block, schedule, state))
            .and_then(|_| self.verify_txs(block, parent, txs))
            .and_then(|_| self.verify_with_vm(block, db))
            .map_err(|e| reject(block, e))
    }

    /// Header, transaction and re-execution checks; signature and schedule
    /// checks are [`BlockVerifier::verify_basics`].
    pub fn verify_block(
        &self,
        block: &Block,
        parent: &Block,
        lib: &Block,
        txs: &dyn TxSource,
        db: &mut dyn StateDb,
    ) -> Result<(), ConsensusError> {
        self.verify_block_head(block, parent, lib, now_secs())
            .and_then(|_| self.verify_txs(block, parent, txs))
            .and_then(|_| self.verify_with_vm(block, db))
            .map_err(|e| reject(block, e))
    }

    /// Check the header against the clock, the irreversible block and the
    /// parent, and recompute its content hashes.
    pub fn verify_block_head(
        &self,
        block: &Block,
        parent: &Block,
        lib: &Block,
        now_secs: u64,
    ) -> Result<(), ConsensusError> {
        let head = &block.head;
        // one slot of clock skew is tolerated
        if head.time > now_secs / self.slot_length + 1 {
            return Err(ConsensusError::FutureBlock);
        }
        if head.time <= lib.head.time {
            return Err(ConsensusError::TooOldBlock);
        }
        if head.parent_hash != parent.head_hash() {
            return Err(ConsensusError::WrongParentHash);
        }
        if head.number != parent.head.number + 1 {
            return Err(ConsensusError::WrongNumber);
        }
        if block.calculate_txs_hash() != head.txs_hash {
            return Err(ConsensusError::WrongTxsHash);
        }
        if block.calculate_merkle_hash() != head.merkle_hash {
            return Err(ConsensusError::WrongMerkleHash);
        }
        Ok(())
    }

    /// Check the producer was scheduled for the slot, signed the header, and
    /// has not already produced for this slot.
    pub fn verify_basics(
        &self,
        block: &Block,
        schedule: &dyn WitnessSchedule,
        state: &ConsensusState,
    ) -> Result<(), ConsensusError> {
        let head = &block.head;
        if schedule.scheduled_witness(head.time) != Some(head.witness.as_str()) {
            return Err(ConsensusError::WrongWitness);
        }

        let signature =
            Signature::decode(&head.signature).map_err(|_| ConsensusError::WrongSignature)?;
        if account_id_from_pubkey(&signature.pubkey) != head.witness {
            return Err(ConsensusError::WrongPubkey);
        }
        if !verify(&head.head_info(), &signature) {
            return Err(ConsensusError::WrongSignature);
        }

        if state.has_slot_witness(head.time) {
            return Err(ConsensusError::DuplicateSlotWitness);
        }
        Ok(())
    }

    /// Reject transactions already on `parent`'s chain, badly signed, or
    /// older than the allowed age at the block's slot time.
    pub fn verify_txs(
        &self,
        block: &Block,
        parent: &Block,
        txs: &dyn TxSource,
    ) -> Result<(), ConsensusError> {
        let block_secs = (block.head.time * self.slot_length) as i64;
        for tx in &block.txs {
            match txs.exist_txs(&tx.hash(), parent) {
                FoundStatus::FoundChain => return Err(ConsensusError::DuplicateTx),
                // signatures were checked on admission
                FoundStatus::FoundPending => {}
                FoundStatus::NotFound => {
                    tx.verify_self()
                        .map_err(|_| ConsensusError::TxWrongSignature)?;
                }
            }
            if block_secs - tx.time / 1_000_000_000 > self.max_tx_age_secs {
                return Err(ConsensusError::TxTooOld);
            }
        }
        Ok(())
    }

    /// Re-execute the block's transactions and compare receipts byte for byte.
    pub fn verify_with_vm(&self, block: &Block, db: &mut dyn StateDb) -> Result<(), ConsensusError> {
        let mut engine = self.engines.bind(&block.head, db);
        let mut receipts = Vec::with_capacity(block.txs.len());
        for tx in &block.txs {
            receipts.push(engine.exec(tx)?);
        }

        if receipts.len() != block.receipts.len() {
            return Err(ConsensusError::WrongTxReceipt);
        }
        for (index, (ours, theirs)) in receipts.iter().zip(&block.receipts).enumerate() {
            if ours.encode() != theirs.encode() {
                debug!(
                    number = block.head.number,
                    index,
                    "Re-executed receipt differs"
                );
                return Err(ConsensusError::WrongTxReceipt);
            }
        }
        Ok(())
    }
}

fn reject(block: &Block, error: ConsensusError) -> ConsensusError {
    VERIFY_FAILURES.with_label_values(&[error.kind()]).inc();
    warn!(
        number = block.head.number,
        witness = %block.head.witness,
        slot = block.head.time,
        error = %error,
        "Block rejected"
    );
    error
}
