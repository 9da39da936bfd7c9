// Copyright (c) 2026 Vouch Foundation

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::info;

use super::ConsensusState;
use crate::{blockcache::BlockCacheNode, metrics::IRREVERSIBLE_HEIGHT};

/// Find the new last irreversible block on the chain from `node` down to
/// `root`, the current one.
///
/// Walking from the tip, each node's witness vouches for every ancestor down
/// to the node's `confirm_until`. The first node covered by votes of at least
/// [`ConsensusState::confirm_threshold`] distinct witnesses is returned.
/// Returns `None` when `root`, or the oldest node of the chain, is reached
/// first.
pub fn calculate_confirm(
    state: &ConsensusState,
    node: &Arc<BlockCacheNode>,
    root: &Arc<BlockCacheNode>,
) -> Option<Arc<BlockCacheNode>> {
    let threshold = state.confirm_threshold();
    let start = node.number;

    let mut confirming: HashSet<&str> = HashSet::new();
    // depth -> witnesses whose vote stops covering below that depth
    let mut expiry: HashMap<u64, Vec<&str>> = HashMap::new();

    let mut cursor = node;
    let mut depth = 0u64;
    while !Arc::ptr_eq(cursor, root) {
        if cursor.confirm_until <= cursor.number {
            confirming.insert(&cursor.witness);
            expiry
                .entry(start - cursor.confirm_until)
                .or_default()
                .push(&cursor.witness);
        }
        if confirming.len() >= threshold {
            IRREVERSIBLE_HEIGHT.set(cursor.number as i64);
            info!(
                number = cursor.number,
                witnesses = confirming.len(),
                "Block became irreversible"
            );
            return Some(Arc::clone(cursor));
        }

        if let Some(expired) = expiry.remove(&depth) {
            for witness in expired {
                confirming.remove(witness);
            }
        }
        cursor = cursor.parent.as_ref()?;
        depth += 1;
    }
    None
}
