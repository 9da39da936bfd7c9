// Copyright (c) 2026 Vouch Foundation

//! State-store view consumed by the host.

use std::collections::{BTreeMap, HashMap};

use crate::{Contract, HostError};

const CONTRACT_TABLE: &str = "contract";

/// A versioned key/value state view.
///
/// Implementations must support tagging the current state under a label so
/// competing forks can each be resumed from their own snapshot.
pub trait StateDb {
    fn get(&self, table: &str, key: &str) -> Option<Vec<u8>>;

    fn put(&mut self, table: &str, key: &str, value: Vec<u8>);

    fn del(&mut self, table: &str, key: &str);

    fn has(&self, table: &str, key: &str) -> bool {
        self.get(table, key).is_some()
    }

    /// Snapshot the current state under `label`.
    fn tag(&mut self, label: &str);

    fn has_contract(&self, id: &str) -> bool {
        self.has(CONTRACT_TABLE, id)
    }

    fn contract(&self, id: &str) -> Result<Option<Contract>, HostError> {
        self.get(CONTRACT_TABLE, id)
            .map(|bytes| Contract::decode(&bytes))
            .transpose()
    }

    fn set_contract(&mut self, contract: &Contract) -> Result<(), HostError> {
        let bytes = contract.encode()?;
        self.put(CONTRACT_TABLE, &contract.id, bytes);
        Ok(())
    }

    fn del_contract(&mut self, id: &str) {
        self.del(CONTRACT_TABLE, id);
    }
}

type Tables = BTreeMap<(String, String), Vec<u8>>;

/// In-memory state store with tagged snapshots.
#[derive(Debug, Clone, Default)]
pub struct MemoryStateDb {
    data: Tables,
    tags: HashMap<String, Tables>,
}

impl MemoryStateDb {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the current state with the snapshot tagged `label`.
    ///
    /// Returns `false` when no such tag exists.
    pub fn checkout(&mut self, label: &str) -> bool {
        match self.tags.get(label) {
            Some(snapshot) => {
                self.data = snapshot.clone();
                true
            }
            None => false,
        }
    }

    pub fn has_tag(&self, label: &str) -> bool {
        self.tags.contains_key(label)
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl StateDb for MemoryStateDb {
    fn get(&self, table: &str, key: &str) -> Option<Vec<u8>> {
        self.data
            .get(&(table.to_string(), key.to_string()))
            .cloned()
    }

    fn put(&mut self, table: &str, key: &str, value: Vec<u8>) {
        self.data.insert((table.to_string(), key.to_string()), value);
    }

    fn del(&mut self, table: &str, key: &str) {
        self.data.remove(&(table.to_string(), key.to_string()));
    }

    fn tag(&mut self, label: &str) {
        self.tags.insert(label.to_string(), self.data.clone());
    }
}
