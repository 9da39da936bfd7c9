// Copyright (c) 2026 Vouch Foundation

//! VM engine: runs transactions against a state view on behalf of the block
//! producer and the block verifier.
//!
//! An engine is bound to one block header and one state view and executes
//! that block's transactions strictly in order. Execution must be
//! deterministic: the same header, state and transaction always produce the
//! same receipt bytes.

use std::sync::Arc;
use thiserror::Error;
use tracing::debug;
use vch_vm_host::{BlockInfo, Cost, Host, HostError, Monitor, StateDb, TxInfo};

use crate::{
    block::BlockHeader,
    transaction::{Status, Tx, TxReceipt},
};

/// Smallest gas limit a transaction may declare.
pub const MIN_GAS_LIMIT: i64 = 100;

/// Reasons a transaction cannot be executed at all.
///
/// A transaction whose actions fail still executes and yields a receipt; its
/// status records the failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("gas limit {0} below minimum {}", MIN_GAS_LIMIT)]
    GasLimitTooLow(i64),

    #[error("negative gas price {0}")]
    NegativeGasPrice(i64),

    #[error("transaction expired at {expiration}, block time {block_time}")]
    Expired { expiration: i64, block_time: i64 },

    #[error("transaction has no publisher")]
    NoPublisher,

    #[error("host error: {0}")]
    Host(#[from] HostError),
}

pub trait Engine {
    fn exec(&mut self, tx: &Tx) -> Result<TxReceipt, EngineError>;
}

/// Binds engines to a block header and a state view.
pub trait EngineFactory {
    fn bind<'a>(&self, header: &BlockHeader, db: &'a mut dyn StateDb) -> Box<dyn Engine + 'a>;
}

/// Engine factory backed by the contract [`Host`].
#[derive(Clone)]
pub struct HostEngineFactory {
    monitor: Arc<dyn Monitor>,
    slot_length: u64,
}

impl HostEngineFactory {
    pub fn new(monitor: Arc<dyn Monitor>, slot_length: u64) -> Self {
        Self {
            monitor,
            slot_length,
        }
    }
}

impl EngineFactory for HostEngineFactory {
    fn bind<'a>(&self, header: &BlockHeader, db: &'a mut dyn StateDb) -> Box<dyn Engine + 'a> {
        Box::new(HostEngine {
            host: Host::new(db, Arc::clone(&self.monitor)),
            block_info: BlockInfo {
                number: header.number,
                parent_hash: hex::encode(&header.parent_hash),
                witness: header.witness.clone(),
                time: header.time,
            },
            block_time_nanos: (header.time * self.slot_length) as i64 * 1_000_000_000,
        })
    }
}

pub struct HostEngine<'a> {
    host: Host<'a>,
    block_info: BlockInfo,
    block_time_nanos: i64,
}

impl<'a> HostEngine<'a> {
    fn run(&mut self, tx: &Tx, publisher: &str, tx_hash: [u8; 32]) -> Result<TxReceipt, EngineError> {
        self.host.set_block_info(&self.block_info)?;
        self.host.set_tx_info(&TxInfo {
            hash: hex::encode(tx_hash),
            publisher: publisher.to_string(),
            signers: tx.signers.clone(),
            time: tx.time,
            gas_price: tx.gas_price,
        })?;

        let mut total = Cost::default();
        let mut status = Status::success();
        let mut success_action_count = 0;

        for action in &tx.actions {
            let (result, cost) =
                self.host
                    .call_with_receipt(&action.contract, &action.action_name, &action.data);
            total += cost;

            if total.to_gas() > tx.gas_limit {
                status = Status::gas_run_out(tx.gas_limit);
                break;
            }
            if let Err(e) = result {
                status = Status::from_error(&e);
                break;
            }
            success_action_count += 1;
        }

        if let Err(e) = self.host.teller().pay_cost(publisher, &total, tx.gas_price) {
            if status.is_success() {
                status = Status::from_error(&e);
            }
        }

        Ok(TxReceipt {
            tx_hash,
            gas_usage: total.to_gas(),
            status,
            success_action_count,
            receipts: self.host.events().take_receipts(),
        })
    }
}

impl<'a> Engine for HostEngine<'a> {
    fn exec(&mut self, tx: &Tx) -> Result<TxReceipt, EngineError> {
        if tx.gas_limit < MIN_GAS_LIMIT {
            return Err(EngineError::GasLimitTooLow(tx.gas_limit));
        }
        if tx.gas_price < 0 {
            return Err(EngineError::NegativeGasPrice(tx.gas_price));
        }
        if tx.expiration <= self.block_time_nanos {
            return Err(EngineError::Expired {
                expiration: tx.expiration,
                block_time: self.block_time_nanos,
            });
        }
        let publisher = tx.publisher_id().ok_or(EngineError::NoPublisher)?;
        let tx_hash = tx.hash();

        self.host.push_ctx();
        let outcome = self.run(tx, &publisher, tx_hash);
        self.host.pop_ctx();
        // receipts of a tx that never finished must not leak into the next
        self.host.events().take_receipts();

        if let Ok(receipt) = &outcome {
            debug!(
                tx = %hex::encode(tx_hash),
                gas = receipt.gas_usage,
                status = ?receipt.status.code,
                "Executed transaction"
            );
        }
        outcome
    }
}
