// Copyright (c) 2026 Vouch Foundation

/// Maps a slot to the witness allowed to produce in it.
///
/// Implementations must be pure: two nodes with the same witness list agree
/// on the witness of every slot.
pub trait WitnessSchedule {
    fn scheduled_witness(&self, slot: u64) -> Option<&str>;
}

/// Witnesses take turns in list order, one slot each.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundRobinSchedule {
    witnesses: Vec<String>,
}

impl RoundRobinSchedule {
    pub fn new(witnesses: Vec<String>) -> Self {
        Self { witnesses }
    }

    pub fn witnesses(&self) -> &[String] {
        &self.witnesses
    }

    pub fn len(&self) -> usize {
        self.witnesses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.witnesses.is_empty()
    }
}

impl WitnessSchedule for RoundRobinSchedule {
    fn scheduled_witness(&self, slot: u64) -> Option<&str> {
        if self.witnesses.is_empty() {
            return None;
        }
        let index = (slot % self.witnesses.len() as u64) as usize;
        Some(self.witnesses[index].as_str())
    }
}
