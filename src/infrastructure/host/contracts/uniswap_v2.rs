// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@oxidity.com>

use crate::common::constants::{UNISWAP_V2_DEFAULT_FEE_NUMERATOR, UNISWAP_V2_FEE_DENOMINATOR};
use crate::common::error::HostError;
use crate::infrastructure::data::abi::IUniswapV2Pair::{self, IUniswapV2PairCalls};
use crate::infrastructure::host::Ledger;
use crate::infrastructure::host::contracts::{CallEnv, Contract, unknown_selector};
use alloy::primitives::{Address, Bytes, U256};
use alloy_sol_types::{SolInterface, SolValue};

/// Constant-product pair with UniswapV2 `swap` semantics: the caller transfers input
/// first, the pair pays out optimistically and then checks the fee-adjusted invariant
/// against its actual balances. The fee is a numerator per 1e6 kept as input
/// (997000 is the canonical 0.3%).
#[derive(Clone, Debug)]
pub struct ConstantProductPair {
    token0: Address,
    token1: Address,
    reserve0: U256,
    reserve1: U256,
    fee_numerator: u64,
}

impl ConstantProductPair {
    pub fn new(token0: Address, token1: Address) -> Self {
        Self {
            token0,
            token1,
            reserve0: U256::ZERO,
            reserve1: U256::ZERO,
            fee_numerator: UNISWAP_V2_DEFAULT_FEE_NUMERATOR,
        }
    }

    pub fn with_fee(mut self, fee_numerator: u64) -> Self {
        self.fee_numerator = fee_numerator.min(UNISWAP_V2_FEE_DENOMINATOR);
        self
    }

    /// Mints the reserves to `address` and deploys a 0.3% pair that tracks them.
    pub fn deploy(
        ledger: &mut Ledger,
        address: Address,
        token0: Address,
        token1: Address,
        reserve0: U256,
        reserve1: U256,
    ) {
        Self::new(token0, token1).install(ledger, address, reserve0, reserve1);
    }

    /// Mints the reserves to `address` and deploys this pair there.
    pub fn install(mut self, ledger: &mut Ledger, address: Address, reserve0: U256, reserve1: U256) {
        ledger.mint(self.token0, address, reserve0);
        ledger.mint(self.token1, address, reserve1);
        self.reserve0 = reserve0;
        self.reserve1 = reserve1;
        ledger.deploy(address, self);
    }

    pub fn reserves(&self) -> (U256, U256) {
        (self.reserve0, self.reserve1)
    }

    fn swap(
        &mut self,
        env: &mut CallEnv<'_>,
        call: IUniswapV2Pair::swapCall,
    ) -> Result<Bytes, HostError> {
        let (amount0_out, amount1_out) = (call.amount0Out, call.amount1Out);
        if amount0_out.is_zero() && amount1_out.is_zero() {
            return Err(env.revert("UniswapV2: INSUFFICIENT_OUTPUT_AMOUNT"));
        }
        if amount0_out >= self.reserve0 || amount1_out >= self.reserve1 {
            return Err(env.revert("UniswapV2: INSUFFICIENT_LIQUIDITY"));
        }
        if call.to == self.token0 || call.to == self.token1 {
            return Err(env.revert("UniswapV2: INVALID_TO"));
        }

        if !amount0_out.is_zero() {
            env.bank.transfer(self.token0, env.this, call.to, amount0_out)?;
        }
        if !amount1_out.is_zero() {
            env.bank.transfer(self.token1, env.this, call.to, amount1_out)?;
        }

        let balance0 = env.self_balance(self.token0);
        let balance1 = env.self_balance(self.token1);
        let amount0_in = balance0.saturating_sub(self.reserve0 - amount0_out);
        let amount1_in = balance1.saturating_sub(self.reserve1 - amount1_out);
        if amount0_in.is_zero() && amount1_in.is_zero() {
            return Err(env.revert("UniswapV2: INSUFFICIENT_INPUT_AMOUNT"));
        }

        let scale = U256::from(UNISWAP_V2_FEE_DENOMINATOR);
        let fee = U256::from(UNISWAP_V2_FEE_DENOMINATOR - self.fee_numerator);
        let adjusted0 = balance0.saturating_mul(scale) - amount0_in.saturating_mul(fee);
        let adjusted1 = balance1.saturating_mul(scale) - amount1_in.saturating_mul(fee);
        let k_before = self
            .reserve0
            .saturating_mul(self.reserve1)
            .saturating_mul(scale * scale);
        if adjusted0.saturating_mul(adjusted1) < k_before {
            return Err(env.revert("UniswapV2: K"));
        }

        self.reserve0 = balance0;
        self.reserve1 = balance1;
        Ok(Bytes::new())
    }
}

impl Contract for ConstantProductPair {
    fn call(&mut self, env: &mut CallEnv<'_>, data: &[u8]) -> Result<Bytes, HostError> {
        let call =
            IUniswapV2PairCalls::abi_decode(data).map_err(|_| unknown_selector(env, data))?;
        match call {
            IUniswapV2PairCalls::token0(_) => Ok(self.token0.abi_encode().into()),
            IUniswapV2PairCalls::token1(_) => Ok(self.token1.abi_encode().into()),
            IUniswapV2PairCalls::getReserves(_) => {
                Ok((self.reserve0, self.reserve1, 0u32).abi_encode_params().into())
            }
            IUniswapV2PairCalls::swap(call) => self.swap(env, call),
        }
    }

    fn clone_box(&self) -> Box<dyn Contract> {
        Box::new(self.clone())
    }
}
