// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@oxidity.com>

//! Reference pool contracts for the in-memory ledger.
//!
//! They speak the same ABI as their on-chain counterparts so adapters cannot tell
//! them apart, but their pricing is deliberately simple.

pub mod lido;
pub mod stableswap;
pub mod uniswap_v2;

pub use lido::{StakedEther, WrappedStakedEther};
pub use stableswap::{IndexKind, StableSwapPool};
pub use uniswap_v2::ConstantProductPair;

use crate::common::error::HostError;
use crate::infrastructure::host::Bank;
use alloy::primitives::{Address, Bytes, U256};

/// Execution environment handed to a contract for one call.
pub struct CallEnv<'a> {
    pub this: Address,
    pub caller: Address,
    /// Native value already credited to `this` before the call started.
    pub value: U256,
    pub bank: &'a mut Bank,
}

impl CallEnv<'_> {
    pub fn revert(&self, reason: impl Into<String>) -> HostError {
        HostError::Revert {
            target: self.this,
            reason: reason.into(),
        }
    }

    pub fn self_balance(&self, token: Address) -> U256 {
        self.bank.balance_of(token, self.this)
    }
}

pub trait Contract: Send + Sync {
    fn call(&mut self, env: &mut CallEnv<'_>, data: &[u8]) -> Result<Bytes, HostError>;

    fn clone_box(&self) -> Box<dyn Contract>;
}

impl Clone for Box<dyn Contract> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}

pub(crate) fn unknown_selector(env: &CallEnv<'_>, data: &[u8]) -> HostError {
    let selector = data.get(..4).map(hex::encode).unwrap_or_default();
    env.revert(format!("unknown selector 0x{selector}"))
}
