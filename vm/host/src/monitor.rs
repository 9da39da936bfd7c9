// Copyright (c) 2026 Vouch Foundation

use serde_json::Value;

use crate::{Contract, Cost, Host, HostError};

/// A result paired with the cost incurred producing it.
pub type Metered<T> = (Result<T, HostError>, Cost);

/// The VM front end: compiles contracts and runs their entry points.
///
/// The monitor receives the calling host so contract code can reach the
/// host capabilities, including nested [`Host::call`]s.
pub trait Monitor {
    /// Run `api` of `contract` with JSON-encoded `args`.
    fn call(&self, host: &mut Host<'_>, contract: &str, api: &str, args: &str)
        -> Metered<Vec<Value>>;

    /// Compile a contract, returning the code to persist.
    fn compile(&self, contract: &Contract) -> Result<String, HostError>;
}
