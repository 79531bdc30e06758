// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@oxidity.com>

use crate::common::constants::is_native;
use crate::common::error::HostError;
use crate::infrastructure::data::abi::{
    ICurveInt128Pool::ICurveInt128PoolCalls, ICurveLegacyViews::ICurveLegacyViewsCalls,
    ICurvePool2, ICurvePool3, ICurvePool4, ICurveTriCryptoPool,
    ICurveUint256Pool::ICurveUint256PoolCalls, ICurveViews::ICurveViewsCalls,
};
use crate::infrastructure::host::Ledger;
use crate::infrastructure::host::contracts::{CallEnv, Contract, unknown_selector};
use alloy::primitives::{Address, Bytes, U256};
use alloy_sol_types::{SolCall, SolInterface, SolValue};

/// Signedness of the coin indices a pool generation accepts.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IndexKind {
    Int128,
    Uint256,
}

const BPS: u64 = 10_000;

/// Curve-style pool that prices every coin at par less a flat fee.
///
/// Accepts the native sentinel as a coin, mints LP on `add_liquidity` and burns it
/// on `remove_liquidity_one_coin`. The LP token may live at the pool address or at
/// a separate address, which exercises receipt-token lookups.
#[derive(Clone, Debug)]
pub struct StableSwapPool {
    coins: Vec<Address>,
    lp_token: Address,
    index_kind: IndexKind,
    fee_bps: u64,
}

impl StableSwapPool {
    pub fn new(
        coins: Vec<Address>,
        lp_token: Address,
        index_kind: IndexKind,
        fee_bps: u64,
    ) -> Self {
        Self {
            coins,
            lp_token,
            index_kind,
            fee_bps: fee_bps.min(BPS),
        }
    }

    /// Mints `balances[i]` of `coins[i]` to `address` and deploys the pool there.
    pub fn deploy(ledger: &mut Ledger, address: Address, pool: Self, balances: &[U256]) {
        for (coin, balance) in pool.coins.iter().zip(balances) {
            ledger.mint(*coin, address, *balance);
        }
        ledger.deploy(address, pool);
    }

    pub fn coins(&self) -> &[Address] {
        &self.coins
    }

    fn after_fee(&self, amount: U256) -> U256 {
        amount.saturating_mul(U256::from(BPS - self.fee_bps)) / U256::from(BPS)
    }

    fn index_u256(&self, env: &CallEnv<'_>, raw: U256) -> Result<usize, HostError> {
        if raw >= U256::from(self.coins.len()) {
            return Err(env.revert(format!("coin index {raw} out of range")));
        }
        Ok(raw.to::<usize>())
    }

    fn index_i128(&self, env: &CallEnv<'_>, raw: i128) -> Result<usize, HostError> {
        usize::try_from(raw)
            .ok()
            .filter(|i| *i < self.coins.len())
            .ok_or_else(|| env.revert(format!("coin index {raw} out of range")))
    }

    fn pull(&self, env: &mut CallEnv<'_>, coin: Address, amount: U256) -> Result<(), HostError> {
        if is_native(coin) {
            if env.value != amount {
                return Err(env.revert("msg.value mismatch"));
            }
            return Ok(());
        }
        env.bank.transfer_from(coin, env.this, env.caller, env.this, amount)
    }

    fn pay(&self, env: &mut CallEnv<'_>, coin: Address, amount: U256) -> Result<(), HostError> {
        if env.self_balance(coin) < amount {
            return Err(env.revert("insufficient pool balance"));
        }
        env.bank.transfer(coin, env.this, env.caller, amount)
    }

    fn exchange(
        &mut self,
        env: &mut CallEnv<'_>,
        i: usize,
        j: usize,
        dx: U256,
        min_dy: U256,
    ) -> Result<Bytes, HostError> {
        if i == j {
            return Err(env.revert("same coin"));
        }
        if !is_native(self.coins[i]) && !env.value.is_zero() {
            return Err(env.revert("unexpected msg.value"));
        }
        self.pull(env, self.coins[i], dx)?;
        let dy = self.after_fee(dx);
        if dy < min_dy {
            return Err(env.revert("Exchange resulted in fewer coins than expected"));
        }
        self.pay(env, self.coins[j], dy)?;
        Ok(dy.abi_encode().into())
    }

    /// Tricrypto-style `exchange`: a native coin only moves when `use_eth` is set.
    fn exchange_tricrypto(
        &mut self,
        env: &mut CallEnv<'_>,
        call: ICurveTriCryptoPool::exchangeCall,
    ) -> Result<Bytes, HostError> {
        let i = self.index_u256(env, call.i)?;
        let j = self.index_u256(env, call.j)?;
        if !call.use_eth && (is_native(self.coins[i]) || is_native(self.coins[j])) {
            return Err(env.revert("native coin requires use_eth"));
        }
        self.exchange(env, i, j, call.dx, call.min_dy)
    }

    fn add_liquidity(
        &mut self,
        env: &mut CallEnv<'_>,
        amounts: &[U256],
        min_mint: U256,
    ) -> Result<Bytes, HostError> {
        if amounts.len() != self.coins.len() {
            return Err(env.revert("amounts length mismatch"));
        }
        let native_expected = self
            .coins
            .iter()
            .zip(amounts)
            .filter(|(coin, _)| is_native(**coin))
            .map(|(_, amount)| *amount)
            .next()
            .unwrap_or(U256::ZERO);
        if env.value != native_expected {
            return Err(env.revert("msg.value mismatch"));
        }

        let mut total = U256::ZERO;
        for (coin, amount) in self.coins.clone().into_iter().zip(amounts) {
            if amount.is_zero() {
                continue;
            }
            self.pull(env, coin, *amount)?;
            total = total.saturating_add(*amount);
        }
        if total.is_zero() {
            return Err(env.revert("zero deposit"));
        }
        let minted = self.after_fee(total);
        if minted < min_mint {
            return Err(env.revert("Slippage screwed you"));
        }
        env.bank.mint(self.lp_token, env.caller, minted);
        Ok(minted.abi_encode().into())
    }

    fn remove_liquidity_one_coin(
        &mut self,
        env: &mut CallEnv<'_>,
        token_amount: U256,
        i: usize,
        min_amount: U256,
    ) -> Result<Bytes, HostError> {
        env.bank.burn(self.lp_token, env.caller, token_amount)?;
        let dy = self.after_fee(token_amount);
        if dy < min_amount {
            return Err(env.revert("Not enough coins removed"));
        }
        self.pay(env, self.coins[i], dy)?;
        Ok(dy.abi_encode().into())
    }

    fn try_add_liquidity(
        &mut self,
        env: &mut CallEnv<'_>,
        data: &[u8],
    ) -> Option<Result<Bytes, HostError>> {
        if let Ok(call) = ICurvePool2::add_liquidityCall::abi_decode(data) {
            return Some(self.add_liquidity(env, &call.amounts, call.min_mint_amount));
        }
        if let Ok(call) = ICurvePool3::add_liquidityCall::abi_decode(data) {
            return Some(self.add_liquidity(env, &call.amounts, call.min_mint_amount));
        }
        if let Ok(call) = ICurvePool4::add_liquidityCall::abi_decode(data) {
            return Some(self.add_liquidity(env, &call.amounts, call.min_mint_amount));
        }
        None
    }

    fn dispatch_int128(
        &mut self,
        env: &mut CallEnv<'_>,
        call: ICurveInt128PoolCalls,
    ) -> Result<Bytes, HostError> {
        match call {
            ICurveInt128PoolCalls::exchange(c) => {
                let i = self.index_i128(env, c.i)?;
                let j = self.index_i128(env, c.j)?;
                self.exchange(env, i, j, c.dx, c.min_dy)
            }
            ICurveInt128PoolCalls::exchange_underlying(_) => {
                Err(env.revert("exchange_underlying not supported"))
            }
            ICurveInt128PoolCalls::remove_liquidity_one_coin(c) => {
                let i = self.index_i128(env, c.i)?;
                self.remove_liquidity_one_coin(env, c.token_amount, i, c.min_amount)
            }
        }
    }

    fn dispatch_uint256(
        &mut self,
        env: &mut CallEnv<'_>,
        call: ICurveUint256PoolCalls,
    ) -> Result<Bytes, HostError> {
        match call {
            ICurveUint256PoolCalls::exchange(c) => {
                let i = self.index_u256(env, c.i)?;
                let j = self.index_u256(env, c.j)?;
                self.exchange(env, i, j, c.dx, c.min_dy)
            }
            ICurveUint256PoolCalls::exchange_underlying(_) => {
                Err(env.revert("exchange_underlying not supported"))
            }
            ICurveUint256PoolCalls::remove_liquidity_one_coin(c) => {
                let i = self.index_u256(env, c.i)?;
                self.remove_liquidity_one_coin(env, c.token_amount, i, c.min_amount)
            }
        }
    }
}

impl Contract for StableSwapPool {
    fn call(&mut self, env: &mut CallEnv<'_>, data: &[u8]) -> Result<Bytes, HostError> {
        if let Ok(view) = ICurveViewsCalls::abi_decode(data) {
            return match view {
                ICurveViewsCalls::coins(c) => {
                    let i = self.index_u256(env, c.i)?;
                    Ok(self.coins[i].abi_encode().into())
                }
                ICurveViewsCalls::token(_) => Ok(self.lp_token.abi_encode().into()),
                _ => Err(unknown_selector(env, data)),
            };
        }
        if let Ok(ICurveLegacyViewsCalls::coins(c)) = ICurveLegacyViewsCalls::abi_decode(data) {
            let i = self.index_i128(env, c.i)?;
            return Ok(self.coins[i].abi_encode().into());
        }
        if let Some(result) = self.try_add_liquidity(env, data) {
            return result;
        }
        if let Ok(call) = ICurveTriCryptoPool::exchangeCall::abi_decode(data) {
            return self.exchange_tricrypto(env, call);
        }
        match self.index_kind {
            IndexKind::Int128 => match ICurveInt128PoolCalls::abi_decode(data) {
                Ok(call) => self.dispatch_int128(env, call),
                Err(_) => Err(unknown_selector(env, data)),
            },
            IndexKind::Uint256 => match ICurveUint256PoolCalls::abi_decode(data) {
                Ok(call) => self.dispatch_uint256(env, call),
                Err(_) => Err(unknown_selector(env, data)),
            },
        }
    }

    fn clone_box(&self) -> Box<dyn Contract> {
        Box::new(self.clone())
    }
}
