// Copyright (c) 2026 Vouch Foundation

//! Read-only chain and transaction information for contract code.

use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::{Context, HostError};

pub(crate) const BLOCK_INFO_KEY: &str = "block_info";
pub(crate) const TX_INFO_KEY: &str = "tx_info";
pub(crate) const CONTRACT_NAME_KEY: &str = "contract_name";
pub(crate) const CALLER_KEY: &str = "caller";

/// The block a transaction executes in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockInfo {
    pub number: u64,
    pub parent_hash: String,
    pub witness: String,
    pub time: u64,
}

/// The transaction being executed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxInfo {
    pub hash: String,
    pub publisher: String,
    pub signers: Vec<String>,
    pub time: i64,
    pub gas_price: i64,
}

/// Context-backed accessor for [`BlockInfo`], [`TxInfo`] and the call chain.
pub struct Info<'h> {
    ctx: &'h Context,
}

impl<'h> Info<'h> {
    pub(crate) fn new(ctx: &'h Context) -> Self {
        Self { ctx }
    }

    pub fn block_info(&self) -> Result<Option<BlockInfo>, HostError> {
        self.decode(BLOCK_INFO_KEY)
    }

    pub fn tx_info(&self) -> Result<Option<TxInfo>, HostError> {
        self.decode(TX_INFO_KEY)
    }

    /// Contract whose code is currently running.
    pub fn contract_name(&self) -> Option<&str> {
        self.ctx.value(CONTRACT_NAME_KEY).and_then(|v| v.as_str())
    }

    /// Contract that called the running one, if any.
    pub fn caller(&self) -> Option<&str> {
        self.ctx.value(CALLER_KEY).and_then(|v| v.as_str())
    }

    fn decode<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, HostError> {
        self.ctx
            .value(key)
            .map(|v| {
                serde_json::from_value(v.clone())
                    .map_err(|e| HostError::Serialization(e.to_string()))
            })
            .transpose()
    }
}
