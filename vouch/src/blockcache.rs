// Copyright (c) 2026 Vouch Foundation

//! Node shape of the fork tree of accepted blocks.

use std::sync::Arc;

use crate::block::Block;

/// An accepted block plus the consensus metadata finality is computed from.
///
/// Nodes form a tree rooted at the last irreversible block; every node holds
/// its parent, so ancestors live at least as long as their descendants.
#[derive(Debug, Clone)]
pub struct BlockCacheNode {
    pub block: Block,
    pub parent: Option<Arc<BlockCacheNode>>,
    pub number: u64,
    pub witness: String,
    /// Watermark of `witness` at the time this node was accepted
    pub confirm_until: u64,
    pub pending_witness_list: Vec<String>,
}

impl BlockCacheNode {
    /// Wrap a block. Metadata stays unset until
    /// [`ConsensusState::record_acceptance`](crate::consensus::ConsensusState::record_acceptance).
    pub fn new(block: Block, parent: Option<Arc<BlockCacheNode>>) -> Self {
        Self {
            block,
            parent,
            number: 0,
            witness: String::new(),
            confirm_until: 0,
            pending_witness_list: Vec::new(),
        }
    }

    /// Root node for an already irreversible block.
    pub fn root(block: Block, witnesses: Vec<String>) -> Self {
        Self {
            number: block.head.number,
            witness: block.head.witness.clone(),
            confirm_until: 0,
            pending_witness_list: witnesses,
            parent: None,
            block,
        }
    }
}
