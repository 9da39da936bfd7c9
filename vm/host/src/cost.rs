// Copyright (c) 2026 Vouch Foundation

//! Resource cost accounting.

use serde::{Deserialize, Serialize};
use std::ops::{Add, AddAssign};

/// Resource consumption of a host operation.
///
/// Costs are additive and are returned next to every result, so a failed
/// sub-call still contributes what it consumed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cost {
    /// Bytes written to receipts and other network-visible output
    pub net: i64,
    /// Computation units
    pub cpu: i64,
    /// Bytes of persisted state
    pub storage: i64,
}

impl Cost {
    pub const fn new(net: i64, cpu: i64, storage: i64) -> Self {
        Self { net, cpu, storage }
    }

    /// Collapse into a single gas figure.
    pub fn to_gas(&self) -> i64 {
        self.net + self.cpu + self.storage
    }

    pub fn is_zero(&self) -> bool {
        *self == Self::default()
    }
}

impl AddAssign for Cost {
    fn add_assign(&mut self, other: Self) {
        self.net += other.net;
        self.cpu += other.cpu;
        self.storage += other.storage;
    }
}

impl Add for Cost {
    type Output = Cost;

    fn add(mut self, other: Self) -> Self {
        self += other;
        self
    }
}

impl std::iter::Sum for Cost {
    fn sum<I: Iterator<Item = Cost>>(iter: I) -> Self {
        iter.fold(Cost::default(), Add::add)
    }
}

/// Charged when contract compilation fails.
pub const COMPILE_ERR_COST: Cost = Cost::new(0, 10, 0);

/// Charged when the target contract is absent from the state store.
pub const CONTRACT_NOT_FOUND_COST: Cost = Cost::new(0, 10, 0);

/// Charged when an authorization entry point is missing from the contract.
pub const ABI_NOT_FOUND_COST: Cost = Cost::new(0, 10, 0);

/// Charged for removing a contract from the state store.
pub const DEL_CONTRACT_COST: Cost = Cost::new(0, 10, 0);

/// Charged for every state read.
pub const GET_COST: Cost = Cost::new(0, 1, 0);

/// Charged for every balance transfer.
pub const TRANSFER_COST: Cost = Cost::new(0, 10, 0);

/// Cost of appending a serialized receipt of `len` bytes.
pub fn receipt_cost(len: usize) -> Cost {
    Cost::new(len as i64, 0, 0)
}

/// Cost of persisting a contract whose encoding is `len` bytes.
pub fn code_savage_cost(len: usize) -> Cost {
    Cost::new(0, 0, len as i64)
}
