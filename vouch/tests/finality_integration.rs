// Copyright (c) 2026 Vouch Foundation
//
//! Finality integration tests over hand-built fork trees.

mod common;

use serial_test::serial;
use std::sync::Arc;

use common::cache_node;
use vouch::{
    block::Block,
    blockcache::BlockCacheNode,
    consensus::{calculate_confirm, ConsensusState},
    metrics::IRREVERSIBLE_HEIGHT,
};

/// Extend `root` with a chain of first-time votes by `witnesses`, tip last.
fn chain_of(root: &Arc<BlockCacheNode>, witnesses: &[&str]) -> Vec<Arc<BlockCacheNode>> {
    let mut nodes = Vec::new();
    let mut parent = Arc::clone(root);
    for w in witnesses {
        let node = cache_node(Some(Arc::clone(&parent)), parent.number + 1, w, 0);
        nodes.push(Arc::clone(&node));
        parent = node;
    }
    nodes
}

fn accept(state: &mut ConsensusState, parent: &Arc<BlockCacheNode>, witness: &str) -> Arc<BlockCacheNode> {
    let mut block = Block::genesis(witness);
    block.head.number = parent.number + 1;
    block.head.time = parent.block.head.time + 1;
    let mut node = BlockCacheNode::new(block, Some(Arc::clone(parent)));
    state.record_acceptance(&mut node);
    Arc::new(node)
}

#[test]
#[serial]
fn supermajority_of_ten_confirms_seventh_node() {
    let state = ConsensusState::new(10);
    let root = cache_node(None, 0, "root", 0);
    let nodes = chain_of(&root, &["w1", "w2", "w3", "w4", "w5", "w6", "w7"]);
    let tip = nodes.last().unwrap();

    let confirmed = calculate_confirm(&state, tip, &root).unwrap();

    // seven distinct witnesses are first seen at the seventh node from the tip
    assert!(Arc::ptr_eq(&confirmed, &nodes[0]));
    assert_eq!(confirmed.number, 1);
    assert_eq!(IRREVERSIBLE_HEIGHT.get(), 1);
}

#[test]
#[serial]
fn repeated_witnesses_do_not_count_twice() {
    let state = ConsensusState::new(10);
    let root = cache_node(None, 0, "root", 0);
    let nodes = chain_of(
        &root,
        &["w0", "w1", "w2", "w3", "w4", "w5", "w6", "w1", "w1"],
    );
    let tip = nodes.last().unwrap();

    // walking down: w1 w1 w6 w5 w4 w3 w2 w1 w0, the seventh distinct is w0
    let confirmed = calculate_confirm(&state, tip, &root).unwrap();
    assert_eq!(confirmed.number, 1);
    assert_eq!(confirmed.witness, "w0");
}

#[test]
#[serial]
fn no_confirmation_below_threshold() {
    let state = ConsensusState::new(10);
    let root = cache_node(None, 0, "root", 0);
    let nodes = chain_of(&root, &["w1", "w2", "w3", "w4", "w5", "w6"]);

    assert!(calculate_confirm(&state, nodes.last().unwrap(), &root).is_none());
}

#[test]
#[serial]
fn expired_votes_stop_counting() {
    let state = ConsensusState::new(3);
    let root = cache_node(None, 0, "root", 0);
    let n1 = cache_node(Some(Arc::clone(&root)), 1, "a", 0);
    let n2 = cache_node(Some(Arc::clone(&n1)), 2, "b", 0);
    // a already vouched up to 2; this vote only covers blocks from 3 on
    let n3 = cache_node(Some(Arc::clone(&n2)), 3, "a", 3);
    let n4 = cache_node(Some(Arc::clone(&n3)), 4, "c", 0);

    // at n2 only b and c count; a counts again through its earlier block n1
    let confirmed = calculate_confirm(&state, &n4, &root).unwrap();
    assert!(Arc::ptr_eq(&confirmed, &n1));
}

#[test]
#[serial]
fn walk_stops_at_root() {
    let state = ConsensusState::new(3);
    let root = cache_node(None, 0, "root", 0);
    let nodes = chain_of(&root, &["a", "b", "c", "d"]);

    // with n2 as root, only d and c remain above it
    let confirmed = calculate_confirm(&state, &nodes[3], &nodes[1]);
    assert!(confirmed.is_none());

    // without reaching the threshold, a root that is not an ancestor ends
    // the walk at the oldest known node
    let stranger = cache_node(None, 0, "x", 0);
    assert!(calculate_confirm(&ConsensusState::new(10), &nodes[3], &stranger).is_none());
}

#[test]
#[serial]
fn irreversibility_never_regresses() {
    let witnesses = ["a", "b", "c", "d"];
    let mut state = ConsensusState::new(witnesses.len());
    let mut root = cache_node(None, 0, "root", 0);
    let mut tip = Arc::clone(&root);
    let mut confirmations = Vec::new();

    for i in 0..20 {
        tip = accept(&mut state, &tip, witnesses[i % witnesses.len()]);
        if let Some(lib) = calculate_confirm(&state, &tip, &root) {
            assert!(lib.number > root.number);
            assert!(lib.number <= tip.number);
            confirmations.push(lib.number);
            root = lib;
        }
    }

    assert!(!confirmations.is_empty());
    assert!(confirmations.windows(2).all(|w| w[0] < w[1]));
    // with four witnesses taking turns, finality trails the tip by two blocks
    assert_eq!(root.number, tip.number - 2);
}
