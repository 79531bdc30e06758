// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@oxidity.com>

use crate::common::error::HostError;
use crate::infrastructure::data::abi::{ILidoStETH::ILidoStETHCalls, IWstETH::IWstETHCalls};
use crate::infrastructure::host::Ledger;
use crate::infrastructure::host::contracts::{CallEnv, Contract, unknown_selector};
use alloy::primitives::{Address, Bytes, U256};
use alloy_sol_types::{SolInterface, SolValue};

const WAD: u64 = 1_000_000_000_000_000_000;

/// stETH: mints one share-token per native unit submitted. The token lives at the
/// contract address.
#[derive(Clone, Debug, Default)]
pub struct StakedEther;

impl Contract for StakedEther {
    fn call(&mut self, env: &mut CallEnv<'_>, data: &[u8]) -> Result<Bytes, HostError> {
        match ILidoStETHCalls::abi_decode(data) {
            Ok(ILidoStETHCalls::submit(_)) => {
                if env.value.is_zero() {
                    return Err(env.revert("ZERO_DEPOSIT"));
                }
                env.bank.mint(env.this, env.caller, env.value);
                Ok(env.value.abi_encode().into())
            }
            Err(_) => Err(unknown_selector(env, data)),
        }
    }

    fn clone_box(&self) -> Box<dyn Contract> {
        Box::new(self.clone())
    }
}

/// wstETH at a fixed `stEthPerToken` rate (18-decimal fixed point).
#[derive(Clone, Debug)]
pub struct WrappedStakedEther {
    steth: Address,
    steth_per_token: U256,
}

impl WrappedStakedEther {
    pub fn new(steth: Address, steth_per_token: U256) -> Self {
        Self {
            steth,
            steth_per_token,
        }
    }

    /// Deploys the wrapper holding `steth_reserve` stETH to back unwraps.
    pub fn deploy(ledger: &mut Ledger, address: Address, wrapper: Self, steth_reserve: U256) {
        ledger.mint(wrapper.steth, address, steth_reserve);
        ledger.deploy(address, wrapper);
    }

    fn wrap(&self, env: &mut CallEnv<'_>, amount: U256) -> Result<Bytes, HostError> {
        if amount.is_zero() || self.steth_per_token.is_zero() {
            return Err(env.revert("wstETH: can't wrap zero stETH"));
        }
        env.bank
            .transfer_from(self.steth, env.this, env.caller, env.this, amount)?;
        let wrapped = amount.saturating_mul(U256::from(WAD)) / self.steth_per_token;
        env.bank.mint(env.this, env.caller, wrapped);
        Ok(wrapped.abi_encode().into())
    }

    fn unwrap(&self, env: &mut CallEnv<'_>, amount: U256) -> Result<Bytes, HostError> {
        if amount.is_zero() {
            return Err(env.revert("wstETH: zero amount unwrap not allowed"));
        }
        env.bank.burn(env.this, env.caller, amount)?;
        let unwrapped = amount.saturating_mul(self.steth_per_token) / U256::from(WAD);
        env.bank
            .transfer(self.steth, env.this, env.caller, unwrapped)?;
        Ok(unwrapped.abi_encode().into())
    }
}

impl Contract for WrappedStakedEther {
    fn call(&mut self, env: &mut CallEnv<'_>, data: &[u8]) -> Result<Bytes, HostError> {
        match IWstETHCalls::abi_decode(data) {
            Ok(IWstETHCalls::stETH(_)) => Ok(self.steth.abi_encode().into()),
            Ok(IWstETHCalls::wrap(c)) => self.wrap(env, c.stETHAmount),
            Ok(IWstETHCalls::unwrap(c)) => self.unwrap(env, c.wstETHAmount),
            Err(_) => Err(unknown_selector(env, data)),
        }
    }

    fn clone_box(&self) -> Box<dyn Contract> {
        Box::new(self.clone())
    }
}
