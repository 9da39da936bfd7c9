// Copyright (c) 2026 Vouch Foundation

use std::collections::{HashMap, HashSet};
use tracing::trace;

use crate::blockcache::BlockCacheNode;

/// Consensus bookkeeping shared by the producer, the verifier and finality.
///
/// Created once at node start and passed explicitly to every operation that
/// reads or updates it.
#[derive(Debug, Clone, Default)]
pub struct ConsensusState {
    pub number_of_witnesses: usize,
    /// witness -> lowest block number its future confirmations are valid from
    watermark: HashMap<String, u64>,
    /// Slots already produced by their scheduled witness
    seen_slots: HashSet<u64>,
}

impl ConsensusState {
    pub fn new(number_of_witnesses: usize) -> Self {
        Self {
            number_of_witnesses,
            ..Default::default()
        }
    }

    pub fn has_slot_witness(&self, slot: u64) -> bool {
        self.seen_slots.contains(&slot)
    }

    pub fn mark_slot_witness(&mut self, slot: u64) {
        self.seen_slots.insert(slot);
    }

    /// Forget seen slots older than `slot`.
    pub fn prune_slots(&mut self, slot: u64) {
        self.seen_slots.retain(|&s| s >= slot);
    }

    pub fn watermark(&self, witness: &str) -> Option<u64> {
        self.watermark.get(witness).copied()
    }

    /// Distinct witnesses needed to make a block irreversible.
    pub fn confirm_threshold(&self) -> usize {
        self.number_of_witnesses * 2 / 3 + 1
    }

    /// Fill in `node`'s consensus metadata on acceptance and advance the
    /// producing witness's watermark.
    pub fn record_acceptance(&mut self, node: &mut BlockCacheNode) {
        let head = &node.block.head;
        node.number = head.number;
        node.witness = head.witness.clone();
        self.mark_slot_witness(head.time);

        match self.watermark.get(&node.witness).copied() {
            Some(mark) => {
                node.confirm_until = mark;
                if node.number >= mark {
                    self.watermark.insert(node.witness.clone(), node.number + 1);
                }
            }
            None => {
                node.confirm_until = 0;
                self.watermark.insert(node.witness.clone(), node.number + 1);
            }
        }

        trace!(
            number = node.number,
            witness = %node.witness,
            confirm_until = node.confirm_until,
            "Recorded block acceptance"
        );
    }

    /// Set the witness list `node` schedules against: `update` when the state
    /// carries one, otherwise the parent's.
    pub fn update_pending_witness(&self, node: &mut BlockCacheNode, update: Option<Vec<String>>) {
        match update {
            Some(list) => node.pending_witness_list = list,
            None => {
                if let Some(parent) = &node.parent {
                    node.pending_witness_list = parent.pending_witness_list.clone();
                }
            }
        }
    }
}
