// Copyright (c) 2026 Vouch Foundation

//! Human-readable names for contract ids.

use crate::{Cost, HostError, Metered, StateDb};

const REGISTRY_TABLE: &str = "registry";

pub struct Registry<'h> {
    db: &'h mut dyn StateDb,
}

impl<'h> Registry<'h> {
    pub(crate) fn new(db: &'h mut dyn StateDb) -> Self {
        Self { db }
    }

    /// Bind `name` to `contract_id`. Names are first come, first served and
    /// may not be the id of a deployed contract.
    pub fn register(&mut self, name: &str, contract_id: &str) -> Metered<()> {
        let cost = Cost::new(0, 1, (name.len() + contract_id.len()) as i64);
        if self.db.has(REGISTRY_TABLE, name) || self.db.has_contract(name) {
            return (Err(HostError::NameTaken(name.to_string())), cost);
        }
        self.db
            .put(REGISTRY_TABLE, name, contract_id.as_bytes().to_vec());
        (Ok(()), cost)
    }

    /// Contract id bound to `name`. A deployed contract id always resolves
    /// to itself, even if the name was registered before the deployment.
    pub fn resolve(&self, name: &str) -> Option<String> {
        if self.db.has_contract(name) {
            return Some(name.to_string());
        }
        self.db
            .get(REGISTRY_TABLE, name)
            .and_then(|bytes| String::from_utf8(bytes).ok())
    }
}
