// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@oxidity.com>

//! Vault gateway: zaps any supported asset into a vault's receipt token before
//! depositing it, and back out after a withdrawal.

use crate::common::constants::{NATIVE_ASSET, is_native};
use crate::common::error::ZapError;
use crate::infrastructure::host::{Host, atomically};
use crate::services::zap::{Invocation, Zap};
use alloy::primitives::{Address, U256};

/// Yield vault that accepts a pool receipt token.
pub trait Vault {
    /// Account that spends depositor allowances.
    fn address(&self) -> Address;

    /// Token the vault takes on deposit and returns on withdrawal.
    fn receipt_token(&self) -> Address;

    /// Pulls `amount` receipt tokens from `from` and credits shares to `receiver`.
    /// Returns the shares issued.
    fn deposit(
        &mut self,
        host: &mut dyn Host,
        from: Address,
        amount: U256,
        receiver: Address,
    ) -> Result<U256, ZapError>;

    /// Redeems `shares` held by `owner` and sends the receipt tokens to `receiver`.
    fn withdraw(
        &mut self,
        host: &mut dyn Host,
        owner: Address,
        shares: U256,
        receiver: Address,
    ) -> Result<U256, ZapError>;
}

#[derive(Debug, Clone, Copy)]
pub struct Gateway {
    address: Address,
}

impl Gateway {
    pub fn new(address: Address) -> Self {
        Self { address }
    }

    pub fn address(&self) -> Address {
        self.address
    }

    /// Converts `amount_in` of `src` into the vault's receipt token and deposits it for
    /// the caller. Returns the shares issued.
    pub fn deposit(
        &self,
        host: &mut dyn Host,
        zap: &mut Zap,
        vault: &mut dyn Vault,
        invocation: Invocation,
        src: Address,
        amount_in: U256,
        min_receipt: U256,
    ) -> Result<U256, ZapError> {
        let receipt = vault.receipt_token();
        let shares = atomically(host, |host| {
            let received = self.pull(host, invocation, src, amount_in)?;
            let amount = if src == receipt {
                received
            } else {
                let value = self.fund(host, src, zap.address(), received)?;
                zap.zap_from(
                    host,
                    Invocation::new(self.address).with_value(value),
                    src,
                    received,
                    receipt,
                    min_receipt,
                )?
            };
            if amount < min_receipt {
                return Err(ZapError::Slippage {
                    min_out: min_receipt,
                    amount_out: amount,
                });
            }
            host.approve(receipt, self.address, vault.address(), amount)?;
            vault.deposit(host, self.address, amount, invocation.caller)
        })?;
        tracing::info!(
            target: "gateway",
            caller = %invocation.caller,
            %src,
            %receipt,
            %amount_in,
            %shares,
            "Deposited"
        );
        Ok(shares)
    }

    /// Redeems `shares` and converts the released receipt tokens into `dst` for the
    /// caller. The vault pulls the shares from the caller directly.
    pub fn withdraw(
        &self,
        host: &mut dyn Host,
        zap: &mut Zap,
        vault: &mut dyn Vault,
        caller: Address,
        shares: U256,
        dst: Address,
        min_out: U256,
    ) -> Result<U256, ZapError> {
        let receipt = vault.receipt_token();
        let amount_out = atomically(host, |host| {
            let before = host.balance_of(receipt, self.address);
            vault.withdraw(host, caller, shares, self.address)?;
            let released = host.balance_of(receipt, self.address).saturating_sub(before);
            let amount_out = if dst == receipt {
                released
            } else {
                host.approve(receipt, self.address, zap.address(), released)?;
                zap.zap_to(
                    host,
                    Invocation::new(self.address),
                    receipt,
                    released,
                    dst,
                    min_out,
                )?
            };
            if amount_out < min_out {
                return Err(ZapError::Slippage {
                    min_out,
                    amount_out,
                });
            }
            host.transfer(dst, self.address, caller, amount_out)?;
            Ok(amount_out)
        })?;
        tracing::info!(target: "gateway", %caller, %receipt, %dst, %shares, %amount_out, "Withdrawn");
        Ok(amount_out)
    }

    fn pull(
        &self,
        host: &mut dyn Host,
        invocation: Invocation,
        src: Address,
        amount_in: U256,
    ) -> Result<U256, ZapError> {
        let before = host.balance_of(src, self.address);
        if is_native(src) {
            if invocation.value != amount_in {
                return Err(ZapError::Value {
                    expected: amount_in,
                    attached: invocation.value,
                });
            }
            host.transfer(NATIVE_ASSET, invocation.caller, self.address, amount_in)?;
        } else {
            host.transfer_from(src, self.address, invocation.caller, self.address, amount_in)?;
        }
        Ok(host.balance_of(src, self.address).saturating_sub(before))
    }

    /// Native input travels as attached value; ERC-20 input is approved to `spender`.
    fn fund(
        &self,
        host: &mut dyn Host,
        token: Address,
        spender: Address,
        amount: U256,
    ) -> Result<U256, ZapError> {
        if is_native(token) {
            return Ok(amount);
        }
        host.approve(token, self.address, spender, amount)?;
        Ok(U256::ZERO)
    }
}
