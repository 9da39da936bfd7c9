// Copyright (c) 2026 Vouch Foundation

//! Account balances and gas payment.

use tracing::debug;

use crate::{cost::TRANSFER_COST, ApiDelegate, Context, Cost, HostError, Metered, StateDb};

const BALANCE_TABLE: &str = "balance";

pub struct Teller<'h> {
    ctx: &'h Context,
    db: &'h mut dyn StateDb,
}

impl<'h> Teller<'h> {
    pub(crate) fn new(ctx: &'h Context, db: &'h mut dyn StateDb) -> Self {
        Self { ctx, db }
    }

    pub fn balance(&self, account: &str) -> Result<i64, HostError> {
        match self.db.get(BALANCE_TABLE, account) {
            None => Ok(0),
            Some(bytes) => {
                let raw: [u8; 8] = bytes.as_slice().try_into().map_err(|_| {
                    HostError::Serialization(format!("balance of {} is malformed", account))
                })?;
                Ok(i64::from_le_bytes(raw))
            }
        }
    }

    /// Credit `account` without any authorization, e.g. for genesis funding.
    pub fn deposit(&mut self, account: &str, amount: i64) -> Result<(), HostError> {
        if amount < 0 {
            return Err(HostError::InvalidAmount(amount));
        }
        let balance = self.balance(account)?;
        self.set_balance(account, credit(account, balance, amount)?);
        Ok(())
    }

    /// Move `amount` from `from` to `to`; `from` must have authorized the call.
    pub fn transfer(&mut self, from: &str, to: &str, amount: i64) -> Metered<()> {
        let result = self.try_transfer(from, to, amount);
        (result, TRANSFER_COST)
    }

    /// Charge `gas * price` to `payer`.
    ///
    /// A fee that does not fit in an `i64` can never be paid and is reported
    /// as [`HostError::BalanceNotEnough`].
    pub fn pay_cost(&mut self, payer: &str, cost: &Cost, price: i64) -> Result<(), HostError> {
        if price < 0 {
            return Err(HostError::InvalidAmount(price));
        }
        let balance = self.balance(payer)?;
        let fee = cost
            .to_gas()
            .checked_mul(price)
            .ok_or_else(|| HostError::BalanceNotEnough {
                account: payer.to_string(),
                balance,
                needed: i64::MAX,
            })?;
        if fee == 0 {
            return Ok(());
        }
        if balance < fee {
            return Err(HostError::BalanceNotEnough {
                account: payer.to_string(),
                balance,
                needed: fee,
            });
        }
        debug!(payer, fee, "Charging gas");
        self.set_balance(payer, balance - fee);
        Ok(())
    }

    fn try_transfer(&mut self, from: &str, to: &str, amount: i64) -> Result<(), HostError> {
        if amount < 0 {
            return Err(HostError::InvalidAmount(amount));
        }
        if !ApiDelegate::new(self.ctx).require_auth(from)? {
            return Err(HostError::Unauthorized(from.to_string()));
        }
        let from_balance = self.balance(from)?;
        if from_balance < amount {
            return Err(HostError::BalanceNotEnough {
                account: from.to_string(),
                balance: from_balance,
                needed: amount,
            });
        }
        if from == to {
            return Ok(());
        }
        let credited = credit(to, self.balance(to)?, amount)?;
        self.set_balance(from, from_balance - amount);
        self.set_balance(to, credited);
        Ok(())
    }

    fn set_balance(&mut self, account: &str, balance: i64) {
        self.db
            .put(BALANCE_TABLE, account, balance.to_le_bytes().to_vec());
    }
}

fn credit(account: &str, balance: i64, amount: i64) -> Result<i64, HostError> {
    balance
        .checked_add(amount)
        .ok_or_else(|| HostError::BalanceOverflow(account.to_string()))
}
