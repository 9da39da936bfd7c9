// Copyright (c) 2026 Vouch Foundation

use crate::{Context, HostError, Info};

/// Authorization checks available to contract code.
pub struct ApiDelegate<'h> {
    info: Info<'h>,
}

impl<'h> ApiDelegate<'h> {
    pub(crate) fn new(ctx: &'h Context) -> Self {
        Self {
            info: Info::new(ctx),
        }
    }

    /// Whether `account` authorized the current execution.
    ///
    /// An account is authorized when it signed or published the transaction,
    /// or when it is the contract that made the current call.
    pub fn require_auth(&self, account: &str) -> Result<bool, HostError> {
        if self.info.caller() == Some(account) {
            return Ok(true);
        }
        Ok(self
            .info
            .tx_info()?
            .map(|tx| tx.publisher == account || tx.signers.iter().any(|s| s == account))
            .unwrap_or(false))
    }
}
