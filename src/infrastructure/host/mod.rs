// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@oxidity.com>

//! Execution host the engine runs against.
//!
//! The engine never assumes whole-call atomicity from its environment. Every
//! top-level operation opens a [`Checkpoint`] and either commits it or reverts to
//! it, so a host only has to provide nested snapshots.

pub mod contracts;
pub mod ledger;

pub use ledger::{Bank, Ledger};

use crate::common::error::HostError;
use alloy::primitives::{Address, Bytes, U256};

/// Handle to a host snapshot. Checkpoints nest; reverting or committing an outer
/// checkpoint also discards every inner one opened after it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Checkpoint(pub(crate) usize);

pub trait Host {
    /// Balance of `token` held by `holder`; the native sentinel reads native balance.
    fn balance_of(&self, token: Address, holder: Address) -> U256;

    fn allowance(&self, token: Address, owner: Address, spender: Address) -> U256;

    fn transfer(
        &mut self,
        token: Address,
        from: Address,
        to: Address,
        amount: U256,
    ) -> Result<(), HostError>;

    /// Moves `amount` from `from` to `to` on behalf of `spender`, consuming allowance.
    fn transfer_from(
        &mut self,
        token: Address,
        spender: Address,
        from: Address,
        to: Address,
        amount: U256,
    ) -> Result<(), HostError>;

    fn approve(
        &mut self,
        token: Address,
        owner: Address,
        spender: Address,
        amount: U256,
    ) -> Result<(), HostError>;

    /// Runs `data` against the contract at `target`, forwarding `value` native units.
    /// A failing call leaves no trace.
    fn call(
        &mut self,
        caller: Address,
        target: Address,
        value: U256,
        data: &[u8],
    ) -> Result<Bytes, HostError>;

    /// Read-only call; any state the callee touches is discarded.
    fn static_call(&mut self, target: Address, data: &[u8]) -> Result<Bytes, HostError>;

    fn checkpoint(&mut self) -> Checkpoint;

    fn revert_to(&mut self, checkpoint: Checkpoint);

    fn commit(&mut self, checkpoint: Checkpoint);
}

/// Runs `op` inside a checkpoint, committing on success and reverting on failure.
pub fn atomically<H, T, E, F>(host: &mut H, op: F) -> Result<T, E>
where
    H: Host + ?Sized,
    F: FnOnce(&mut H) -> Result<T, E>,
{
    let checkpoint = host.checkpoint();
    match op(host) {
        Ok(value) => {
            host.commit(checkpoint);
            Ok(value)
        }
        Err(err) => {
            host.revert_to(checkpoint);
            Err(err)
        }
    }
}
