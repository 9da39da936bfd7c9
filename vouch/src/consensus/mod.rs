// Copyright (c) 2026 Vouch Foundation

//! Slot-scheduled witness consensus.
//!
//! Each slot belongs to one witness of a round-robin schedule. The scheduled
//! witness produces and signs a block ([`BlockProducer`]); every other node
//! checks it and re-executes its transactions ([`BlockVerifier`]). Accepted
//! blocks advance per-witness watermarks in [`ConsensusState`], from which
//! [`calculate_confirm`] derives the last irreversible block.

mod error;
mod finality;
mod producer;
mod schedule;
mod state;
mod verifier;

pub use error::ConsensusError;
pub use finality::calculate_confirm;
pub use producer::{BlockProducer, Deadline, SlotDeadline};
pub use schedule::{RoundRobinSchedule, WitnessSchedule};
pub use state::ConsensusState;
pub use verifier::BlockVerifier;
