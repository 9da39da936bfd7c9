// Copyright (c) 2026 Vouch Foundation

//! Prometheus metrics for block production, verification and finality.
//!
//! - `vouch_tx_pool_size` - Pending transactions seen by the last production round (gauge)
//! - `vouch_generated_blocks_total` - Blocks produced by this node (counter)
//! - `vouch_verify_failures_total{kind}` - Rejected blocks by failure kind (counter)
//! - `vouch_irreversible_height` - Number of the last irreversible block (gauge)

use lazy_static::lazy_static;
use prometheus::{Encoder, IntCounter, IntCounterVec, IntGauge, Opts, Registry, TextEncoder};
use std::sync::Once;

lazy_static! {
    /// Global Prometheus registry for all metrics.
    pub static ref REGISTRY: Registry = Registry::new();

    pub static ref TX_POOL_SIZE: IntGauge = IntGauge::new(
        "vouch_tx_pool_size",
        "Pending transactions pulled for the last produced block"
    ).expect("Failed to create tx_pool_size metric");

    pub static ref GENERATED_BLOCKS: IntCounter = IntCounter::new(
        "vouch_generated_blocks_total",
        "Total blocks produced by this node"
    ).expect("Failed to create generated_blocks metric");

    pub static ref VERIFY_FAILURES: IntCounterVec = IntCounterVec::new(
        Opts::new("vouch_verify_failures_total", "Rejected blocks by failure kind"),
        &["kind"]
    ).expect("Failed to create verify_failures metric");

    pub static ref IRREVERSIBLE_HEIGHT: IntGauge = IntGauge::new(
        "vouch_irreversible_height",
        "Number of the last irreversible block"
    ).expect("Failed to create irreversible_height metric");
}

static INIT: Once = Once::new();

/// Register all metrics with [`REGISTRY`]. Safe to call more than once.
pub fn init_metrics() {
    INIT.call_once(|| {
        REGISTRY
            .register(Box::new(TX_POOL_SIZE.clone()))
            .expect("Failed to register tx_pool_size");
        REGISTRY
            .register(Box::new(GENERATED_BLOCKS.clone()))
            .expect("Failed to register generated_blocks");
        REGISTRY
            .register(Box::new(VERIFY_FAILURES.clone()))
            .expect("Failed to register verify_failures");
        REGISTRY
            .register(Box::new(IRREVERSIBLE_HEIGHT.clone()))
            .expect("Failed to register irreversible_height");
    });
}

/// Text exposition of every registered metric.
pub fn encode_metrics() -> Result<String, prometheus::Error> {
    let mut buffer = Vec::new();
    TextEncoder::new().encode(&REGISTRY.gather(), &mut buffer)?;
    Ok(String::from_utf8_lossy(&buffer).into_owned())
}
