// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@oxidity.com>

use crate::common::constants::NATIVE_ASSET;
use crate::common::error::HostError;
use crate::infrastructure::host::contracts::{CallEnv, Contract};
use crate::infrastructure::host::{Checkpoint, Host};
use alloy::primitives::{Address, Bytes, U256};
use std::collections::HashMap;

/// Token balances and allowances. Native balances live under [`NATIVE_ASSET`].
#[derive(Clone, Debug, Default)]
pub struct Bank {
    balances: HashMap<(Address, Address), U256>,
    allowances: HashMap<(Address, Address, Address), U256>,
}

impl Bank {
    pub fn balance_of(&self, token: Address, holder: Address) -> U256 {
        self.balances
            .get(&(token, holder))
            .copied()
            .unwrap_or(U256::ZERO)
    }

    pub fn allowance(&self, token: Address, owner: Address, spender: Address) -> U256 {
        self.allowances
            .get(&(token, owner, spender))
            .copied()
            .unwrap_or(U256::ZERO)
    }

    pub fn mint(&mut self, token: Address, to: Address, amount: U256) {
        let balance = self.balances.entry((token, to)).or_insert(U256::ZERO);
        *balance = balance.saturating_add(amount);
    }

    pub fn burn(&mut self, token: Address, from: Address, amount: U256) -> Result<(), HostError> {
        self.debit(token, from, amount)
    }

    pub fn transfer(
        &mut self,
        token: Address,
        from: Address,
        to: Address,
        amount: U256,
    ) -> Result<(), HostError> {
        self.debit(token, from, amount)?;
        self.mint(token, to, amount);
        Ok(())
    }

    pub fn transfer_from(
        &mut self,
        token: Address,
        spender: Address,
        from: Address,
        to: Address,
        amount: U256,
    ) -> Result<(), HostError> {
        if spender != from {
            let available = self.allowance(token, from, spender);
            if available < amount {
                return Err(HostError::InsufficientAllowance {
                    token,
                    owner: from,
                    spender,
                    needed: amount,
                    available,
                });
            }
            self.allowances
                .insert((token, from, spender), available - amount);
        }
        self.transfer(token, from, to, amount)
    }

    pub fn approve(&mut self, token: Address, owner: Address, spender: Address, amount: U256) {
        self.allowances.insert((token, owner, spender), amount);
    }

    fn debit(&mut self, token: Address, holder: Address, amount: U256) -> Result<(), HostError> {
        let available = self.balance_of(token, holder);
        if available < amount {
            return Err(HostError::InsufficientBalance {
                token,
                holder,
                needed: amount,
                available,
            });
        }
        self.balances.insert((token, holder), available - amount);
        Ok(())
    }
}

#[derive(Clone, Default)]
struct WorldState {
    bank: Bank,
    contracts: HashMap<Address, Box<dyn Contract>>,
}

/// Journaled in-memory chain state.
///
/// Snapshots are full copies of the world, pushed on a stack. Every `call` runs in
/// its own snapshot so a reverting contract leaves no partial effects behind.
#[derive(Default)]
pub struct Ledger {
    state: WorldState,
    journal: Vec<WorldState>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn deploy(&mut self, address: Address, contract: impl Contract + 'static) {
        tracing::debug!(target: "ledger", %address, "Contract deployed");
        self.state.contracts.insert(address, Box::new(contract));
    }

    pub fn has_code(&self, address: Address) -> bool {
        self.state.contracts.contains_key(&address)
    }

    pub fn mint(&mut self, token: Address, to: Address, amount: U256) {
        self.state.bank.mint(token, to, amount);
    }

    pub fn bank(&self) -> &Bank {
        &self.state.bank
    }

    /// Number of open checkpoints.
    pub fn depth(&self) -> usize {
        self.journal.len()
    }

    fn execute(
        &mut self,
        caller: Address,
        target: Address,
        value: U256,
        data: &[u8],
    ) -> Result<Bytes, HostError> {
        if !value.is_zero() {
            self.state.bank.transfer(NATIVE_ASSET, caller, target, value)?;
        }
        let Some(mut code) = self.state.contracts.remove(&target) else {
            // Plain value transfer to an account without code.
            if data.is_empty() {
                return Ok(Bytes::new());
            }
            return Err(HostError::NoCode(target));
        };
        let mut env = CallEnv {
            this: target,
            caller,
            value,
            bank: &mut self.state.bank,
        };
        let result = code.call(&mut env, data);
        self.state.contracts.insert(target, code);
        result
    }
}

impl Host for Ledger {
    fn balance_of(&self, token: Address, holder: Address) -> U256 {
        self.state.bank.balance_of(token, holder)
    }

    fn allowance(&self, token: Address, owner: Address, spender: Address) -> U256 {
        self.state.bank.allowance(token, owner, spender)
    }

    fn transfer(
        &mut self,
        token: Address,
        from: Address,
        to: Address,
        amount: U256,
    ) -> Result<(), HostError> {
        self.state.bank.transfer(token, from, to, amount)
    }

    fn transfer_from(
        &mut self,
        token: Address,
        spender: Address,
        from: Address,
        to: Address,
        amount: U256,
    ) -> Result<(), HostError> {
        self.state
            .bank
            .transfer_from(token, spender, from, to, amount)
    }

    fn approve(
        &mut self,
        token: Address,
        owner: Address,
        spender: Address,
        amount: U256,
    ) -> Result<(), HostError> {
        self.state.bank.approve(token, owner, spender, amount);
        Ok(())
    }

    fn call(
        &mut self,
        caller: Address,
        target: Address,
        value: U256,
        data: &[u8],
    ) -> Result<Bytes, HostError> {
        let checkpoint = self.checkpoint();
        let result = self.execute(caller, target, value, data);
        match &result {
            Ok(_) => self.commit(checkpoint),
            Err(e) => {
                tracing::debug!(target: "ledger", %caller, %target, error = %e, "Call reverted");
                self.revert_to(checkpoint);
            }
        }
        result
    }

    fn static_call(&mut self, target: Address, data: &[u8]) -> Result<Bytes, HostError> {
        let checkpoint = self.checkpoint();
        let result = self.execute(Address::ZERO, target, U256::ZERO, data);
        self.revert_to(checkpoint);
        result
    }

    fn checkpoint(&mut self) -> Checkpoint {
        self.journal.push(self.state.clone());
        Checkpoint(self.journal.len() - 1)
    }

    fn revert_to(&mut self, checkpoint: Checkpoint) {
        if checkpoint.0 >= self.journal.len() {
            return;
        }
        self.journal.truncate(checkpoint.0 + 1);
        if let Some(snapshot) = self.journal.pop() {
            self.state = snapshot;
        }
    }

    fn commit(&mut self, checkpoint: Checkpoint) {
        self.journal.truncate(checkpoint.0);
    }
}
