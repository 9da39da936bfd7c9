// Copyright (c) 2026 Vouch Foundation

//! Execution host for contract calls.
//!
//! A [`Host`] is the isolate a VM engine runs contract code in. It pairs a
//! state-database view with the current [`Context`], drives the external
//! [`Monitor`] for every call, and exposes the capability views contract code
//! reaches through (storage, chain info, balances, authorization, receipts,
//! naming).
//!
//! Every host operation returns its [`Cost`] next to its result, including on
//! error paths, so the caller can always charge what was consumed.

mod api;
mod context;
mod contract;
mod cost;
mod database;
mod db_handler;
mod error;
mod event;
mod host;
mod info;
mod monitor;
mod registry;
mod teller;

pub use api::ApiDelegate;
pub use context::{Context, Frame};
pub use contract::{Abi, Contract, ContractInfo};
pub use cost::{
    code_savage_cost, receipt_cost, Cost, ABI_NOT_FOUND_COST, COMPILE_ERR_COST,
    CONTRACT_NOT_FOUND_COST, DEL_CONTRACT_COST, GET_COST, TRANSFER_COST,
};
pub use database::{MemoryStateDb, StateDb};
pub use db_handler::DbHandler;
pub use error::HostError;
pub use event::{Event, EventPoster, Receipt, ReceiptKind};
pub use host::Host;
pub use info::{BlockInfo, Info, TxInfo};
pub use monitor::{Metered, Monitor};
pub use registry::Registry;
pub use teller::Teller;
