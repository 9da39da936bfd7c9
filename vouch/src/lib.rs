// Copyright (c) 2026 Vouch Foundation

//! Consensus and contract-execution core of a Vouch node.
//!
//! Blocks are produced by the witness scheduled for each time slot, verified
//! by deterministic re-execution of their transactions, and finalized once a
//! supermajority of distinct witnesses has built on them.

pub mod block;
pub mod blockcache;
mod codec;
pub mod config;
pub mod consensus;
pub mod engine;
pub mod merkle;
pub mod metrics;
pub mod node;
pub mod telemetry;
pub mod time;
pub mod transaction;
pub mod txpool;

pub use block::{Block, BlockHeader};
pub use blockcache::BlockCacheNode;
pub use config::Config;
pub use node::Node;
pub use transaction::{Action, Status, StatusCode, Tx, TxReceipt};
