// Copyright (c) 2026 Vouch Foundation

use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::{
    cost::{
        code_savage_cost, receipt_cost, ABI_NOT_FOUND_COST, COMPILE_ERR_COST,
        CONTRACT_NOT_FOUND_COST, DEL_CONTRACT_COST,
    },
    info::{BLOCK_INFO_KEY, CALLER_KEY, CONTRACT_NAME_KEY, TX_INFO_KEY},
    Abi, ApiDelegate, BlockInfo, Contract, Context, Cost, DbHandler, EventPoster, Frame,
    HostError, Info, Metered, Monitor, ReceiptKind, Registry, StateDb, Teller, TxInfo,
};

/// Isolate a VM engine runs contract code in.
///
/// A host owns the execution context of exactly one call chain and borrows
/// the state view exclusively for its lifetime; concurrent executions each
/// need their own host.
pub struct Host<'a> {
    ctx: Context,
    db: &'a mut dyn StateDb,
    monitor: Arc<dyn Monitor>,
    events: EventPoster,
}

impl<'a> Host<'a> {
    pub fn new(db: &'a mut dyn StateDb, monitor: Arc<dyn Monitor>) -> Self {
        Self {
            ctx: Context::new(),
            db,
            monitor,
            events: EventPoster::default(),
        }
    }

    pub fn context(&self) -> &Context {
        &self.ctx
    }

    pub fn context_mut(&mut self) -> &mut Context {
        &mut self.ctx
    }

    /// Open a plain scope around a batch of calls.
    pub fn push_ctx(&mut self) {
        self.ctx.push();
    }

    /// Close the scope opened by [`Host::push_ctx`].
    pub fn pop_ctx(&mut self) {
        self.ctx.pop();
    }

    pub fn set_block_info(&mut self, info: &BlockInfo) -> Result<(), HostError> {
        let value =
            serde_json::to_value(info).map_err(|e| HostError::Serialization(e.to_string()))?;
        self.ctx.set(BLOCK_INFO_KEY, value);
        Ok(())
    }

    pub fn set_tx_info(&mut self, info: &TxInfo) -> Result<(), HostError> {
        let value =
            serde_json::to_value(info).map_err(|e| HostError::Serialization(e.to_string()))?;
        self.ctx.set(TX_INFO_KEY, value);
        Ok(())
    }

    pub fn db(&mut self) -> &mut dyn StateDb {
        &mut *self.db
    }

    pub fn db_handler(&mut self) -> DbHandler<'_> {
        DbHandler::new(&self.ctx, &mut *self.db)
    }

    pub fn info(&self) -> Info<'_> {
        Info::new(&self.ctx)
    }

    pub fn teller(&mut self) -> Teller<'_> {
        Teller::new(&self.ctx, &mut *self.db)
    }

    pub fn api(&self) -> ApiDelegate<'_> {
        ApiDelegate::new(&self.ctx)
    }

    pub fn events(&mut self) -> &mut EventPoster {
        &mut self.events
    }

    pub fn registry(&mut self) -> Registry<'_> {
        Registry::new(&mut *self.db)
    }

    /// Append a record to the current transaction's receipt log.
    pub fn receipt(&mut self, kind: ReceiptKind, content: String) {
        self.events.receipt(kind, content);
    }

    /// Call `api` on `contract` (an id or a registered name).
    ///
    /// Fails with [`HostError::Reentrancy`] without invoking anything when the
    /// same contract/api pair is already on the call stack.
    pub fn call(&mut self, contract: &str, api: &str, args: &str) -> Metered<Vec<Value>> {
        let contract = self
            .registry()
            .resolve(contract)
            .unwrap_or_else(|| contract.to_string());
        let frame = Frame::new(&contract, api);

        if self.ctx.frames().any(|f| *f == frame) {
            warn!(
                record = %frame,
                height = self.ctx.stack_height(),
                "Refusing reentrant contract call"
            );
            return (Err(HostError::Reentrancy(frame.to_string())), Cost::default());
        }

        let caller = self.ctx.value(CONTRACT_NAME_KEY).cloned();
        let depth = self.ctx.depth();
        self.ctx.push_frame(frame);
        self.ctx.set(CONTRACT_NAME_KEY, Value::String(contract.clone()));
        if let Some(caller) = caller {
            self.ctx.set(CALLER_KEY, caller);
        }

        let monitor = Arc::clone(&self.monitor);
        let outcome = monitor.call(self, &contract, api, args);

        assert_eq!(
            self.ctx.depth(),
            depth + 1,
            "unbalanced execution scopes inside {}-{}",
            contract,
            api
        );
        self.ctx.pop();
        outcome
    }

    /// [`Host::call`], then log `[api, args, status]` to the receipt log.
    ///
    /// The receipt is written and charged for whether or not the call failed.
    pub fn call_with_receipt(
        &mut self,
        contract: &str,
        api: &str,
        args: &str,
    ) -> Metered<Vec<Value>> {
        let (result, mut cost) = self.call(contract, api, args);

        let status = match &result {
            Ok(_) => "success".to_string(),
            Err(e) => e.to_string(),
        };
        let content = match serde_json::to_string(&[api, args, status.as_str()]) {
            Ok(s) => s,
            Err(e) => return (Err(HostError::Serialization(e.to_string())), cost),
        };

        cost += receipt_cost(content.len());
        self.receipt(ReceiptKind::SystemDefined, content);
        (result, cost)
    }

    /// Compile, persist and initialize a contract.
    pub fn set_code(&mut self, mut contract: Contract) -> Metered<()> {
        let monitor = Arc::clone(&self.monitor);

        contract.code = match monitor.compile(&contract) {
            Ok(code) => code,
            Err(e) => {
                debug!(contract = %contract.id, error = %e, "Contract failed to compile");
                return (Err(e), COMPILE_ERR_COST);
            }
        };
        contract.ensure_abi(Abi::init());

        let size = match contract.encode() {
            Ok(bytes) => bytes.len(),
            Err(e) => return (Err(e), Cost::default()),
        };
        if let Err(e) = self.db.set_contract(&contract) {
            return (Err(e), Cost::default());
        }

        let (result, mut cost) = monitor.call(self, &contract.id, "init", "[]");
        cost += code_savage_cost(size);

        debug!(contract = %contract.id, size, gas = cost.to_gas(), "Contract code set");
        (result.map(|_| ()), cost)
    }

    /// Replace a contract's code if its `can_update` entry approves `update_id`.
    pub fn update_code(&mut self, contract: Contract, update_id: &str) -> Metered<()> {
        let args = match serde_json::to_string(&[update_id]) {
            Ok(a) => a,
            Err(e) => return (Err(HostError::Serialization(e.to_string())), Cost::default()),
        };
        let (authorized, cost) = self.authorize(&contract.id, "can_update", &args);
        if let Err(e) = authorized {
            return (
                Err(refusal(e, HostError::UpdateRefused)),
                cost,
            );
        }

        let (result, set_cost) = self.set_code(contract);
        (result, cost + set_cost)
    }

    /// Remove a contract if its `can_destroy` entry approves.
    pub fn destroy_code(&mut self, contract_id: &str) -> Metered<()> {
        let (authorized, cost) = self.authorize(contract_id, "can_destroy", "[]");
        if let Err(e) = authorized {
            return (
                Err(refusal(e, HostError::DestroyRefused)),
                cost,
            );
        }

        self.db.del_contract(contract_id);
        debug!(contract = contract_id, "Contract destroyed");
        (Ok(()), cost + DEL_CONTRACT_COST)
    }

    /// Run an authorization entry point. Only a first return value of exactly
    /// `"true"` authorizes.
    fn authorize(&mut self, contract_id: &str, entry: &str, args: &str) -> Metered<()> {
        let existing = match self.db.contract(contract_id) {
            Ok(Some(c)) => c,
            Ok(None) => {
                return (
                    Err(HostError::ContractNotFound(contract_id.to_string())),
                    CONTRACT_NOT_FOUND_COST,
                )
            }
            Err(e) => return (Err(e), Cost::default()),
        };
        if existing.abi(entry).is_none() {
            debug!(contract = contract_id, entry, "Authorization entry missing");
            return (Err(HostError::Unauthorized(entry.to_string())), ABI_NOT_FOUND_COST);
        }

        let monitor = Arc::clone(&self.monitor);
        let (result, cost) = monitor.call(self, contract_id, entry, args);
        let verdict = match result {
            Ok(values) if matches!(values.first(), Some(Value::String(s)) if s == "true") => {
                Ok(())
            }
            Ok(values) => Err(HostError::Unauthorized(format!(
                "{} returned {:?}",
                entry,
                values.first()
            ))),
            Err(e) => {
                debug!(contract = contract_id, entry, error = %e, "Authorization call failed");
                Err(HostError::Unauthorized(format!("call {}: {}", entry, e)))
            }
        };
        (verdict, cost)
    }
}

/// Map an authorization failure to the operation's refusal error, keeping
/// a missing contract distinguishable.
fn refusal(error: HostError, refused: HostError) -> HostError {
    match error {
        HostError::ContractNotFound(_) | HostError::Serialization(_) => error,
        _ => refused,
    }
}
