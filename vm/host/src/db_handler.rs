// Copyright (c) 2026 Vouch Foundation

//! Contract-scoped storage.

use crate::{
    cost::GET_COST, info::CONTRACT_NAME_KEY, Context, Cost, HostError, Metered, StateDb,
};

const STATE_TABLE: &str = "state";

/// Key/value storage private to the running contract.
///
/// Keys are namespaced as `"<contract>-<key>"`, so one contract can never
/// read or overwrite another contract's entries.
pub struct DbHandler<'h> {
    ctx: &'h Context,
    db: &'h mut dyn StateDb,
}

impl<'h> DbHandler<'h> {
    pub(crate) fn new(ctx: &'h Context, db: &'h mut dyn StateDb) -> Self {
        Self { ctx, db }
    }

    pub fn put(&mut self, key: &str, value: &str) -> Metered<()> {
        let full_key = match self.scoped(key) {
            Ok(k) => k,
            Err(e) => return (Err(e), Cost::default()),
        };
        let cost = Cost::new(0, 1, (key.len() + value.len()) as i64);
        self.db
            .put(STATE_TABLE, &full_key, value.as_bytes().to_vec());
        (Ok(()), cost)
    }

    pub fn get(&self, key: &str) -> Metered<Option<String>> {
        let full_key = match self.scoped(key) {
            Ok(k) => k,
            Err(e) => return (Err(e), Cost::default()),
        };
        let value = self
            .db
            .get(STATE_TABLE, &full_key)
            .map(|bytes| {
                String::from_utf8(bytes).map_err(|e| HostError::Serialization(e.to_string()))
            })
            .transpose();
        (value, GET_COST)
    }

    pub fn has(&self, key: &str) -> Metered<bool> {
        match self.scoped(key) {
            Ok(k) => (Ok(self.db.has(STATE_TABLE, &k)), GET_COST),
            Err(e) => (Err(e), Cost::default()),
        }
    }

    pub fn del(&mut self, key: &str) -> Metered<()> {
        match self.scoped(key) {
            Ok(k) => {
                self.db.del(STATE_TABLE, &k);
                (Ok(()), GET_COST)
            }
            Err(e) => (Err(e), Cost::default()),
        }
    }

    fn scoped(&self, key: &str) -> Result<String, HostError> {
        let contract = self
            .ctx
            .value(CONTRACT_NAME_KEY)
            .and_then(|v| v.as_str())
            .ok_or(HostError::NoContractScope)?;
        Ok(format!("{}-{}", contract, key))
    }
}
