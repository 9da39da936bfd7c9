// Copyright (c) 2026 Vouch Foundation

use thiserror::Error;

/// Errors raised by host operations and by the monitor on its behalf.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HostError {
    #[error("reentrant call to {0}")]
    Reentrancy(String),

    #[error("contract not found: {0}")]
    ContractNotFound(String),

    #[error("update refused")]
    UpdateRefused,

    #[error("destroy refused")]
    DestroyRefused,

    #[error("compile error: {0}")]
    Compile(String),

    /// Error reported by the monitor while running contract code
    #[error("monitor: {0}")]
    Monitor(String),

    #[error("balance not enough: {account} has {balance}, needs {needed}")]
    BalanceNotEnough {
        account: String,
        balance: i64,
        needed: i64,
    },

    #[error("invalid amount: {0}")]
    InvalidAmount(i64),

    #[error("balance of {0} would overflow")]
    BalanceOverflow(String),

    #[error("unauthorized: {0}")]
    Unauthorized(String),

    #[error("name already registered: {0}")]
    NameTaken(String),

    #[error("no contract in scope")]
    NoContractScope,

    #[error("serialization error: {0}")]
    Serialization(String),
}
