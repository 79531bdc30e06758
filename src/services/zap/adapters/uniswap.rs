// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@oxidity.com>

use crate::common::constants::{UNISWAP_V2_DEFAULT_FEE_NUMERATOR, UNISWAP_V2_FEE_DENOMINATOR};
use crate::common::error::ZapError;
use crate::infrastructure::data::abi::{IUniswapV2Pair, IUniswapV3Pool, IUniswapV3Router};
use crate::services::zap::adapters::{HopEnv, token_at};
use crate::services::zap::descriptor::Hop;
use alloy::primitives::aliases::U160;
use alloy::primitives::{Address, Bytes, U256};

/// Metadata bits 0-23 of a UniswapV2 descriptor.
const FEE_BITS_MASK: u64 = 0x00ff_ffff;

/// Fee numerator (per 1e6) a UniswapV2 descriptor asks for. Zero selects 0.3%.
pub fn v2_fee_numerator(metadata: U256) -> Result<u64, ZapError> {
    let raw = (metadata & U256::from(FEE_BITS_MASK)).to::<u64>();
    match raw {
        0 => Ok(UNISWAP_V2_DEFAULT_FEE_NUMERATOR),
        fee if fee <= UNISWAP_V2_FEE_DENOMINATOR => Ok(fee),
        fee => Err(ZapError::config(format!(
            "fee numerator {fee} exceeds {UNISWAP_V2_FEE_DENOMINATOR}"
        ))),
    }
}

/// Constant-product output for `amount_in` after fee.
pub fn v2_amount_out(amount_in: U256, reserve_in: U256, reserve_out: U256, fee: u64) -> U256 {
    let amount_in_with_fee = amount_in.saturating_mul(U256::from(fee));
    let numerator = amount_in_with_fee.saturating_mul(reserve_out);
    let denominator = reserve_in
        .saturating_mul(U256::from(UNISWAP_V2_FEE_DENOMINATOR))
        .saturating_add(amount_in_with_fee);
    if denominator.is_zero() {
        return U256::ZERO;
    }
    numerator / denominator
}

fn pair_tokens(env: &mut HopEnv<'_, '_>, pool: Address) -> Result<[Address; 2], ZapError> {
    let token0 = env.view(pool, IUniswapV2Pair::token0Call {})?;
    let token1 = env.view(pool, IUniswapV2Pair::token1Call {})?;
    Ok([token0, token1])
}

/// Pays the pair directly and calls `swap` with the output computed from its
/// reserves. The input credited is what the pair actually received, which covers
/// fee-on-transfer tokens.
pub fn swap_v2(env: &mut HopEnv<'_, '_>, hop: &Hop, amount_in: U256) -> Result<U256, ZapError> {
    let fee = v2_fee_numerator(hop.metadata)?;
    let tokens = pair_tokens(env, hop.pool)?;
    let token_in = token_at(&tokens, hop.index_in, hop.pool)?;
    let token_out = token_at(&tokens, hop.index_out, hop.pool)?;

    let reserves = env.view(hop.pool, IUniswapV2Pair::getReservesCall {})?;
    let (reserve0, reserve1) = (U256::from(reserves.reserve0), U256::from(reserves.reserve1));
    let (reserve_in, reserve_out) = if hop.index_in == 0 {
        (reserve0, reserve1)
    } else {
        (reserve1, reserve0)
    };

    env.measure(token_out, |env| {
        env.transfer(token_in, hop.pool, amount_in)?;
        let received = env
            .balance_of(token_in, hop.pool)
            .saturating_sub(reserve_in);
        let amount_out = v2_amount_out(received, reserve_in, reserve_out, fee);
        let (amount0_out, amount1_out) = if hop.index_in == 0 {
            (U256::ZERO, amount_out)
        } else {
            (amount_out, U256::ZERO)
        };
        let to = env.account();
        env.invoke(
            hop.pool,
            U256::ZERO,
            IUniswapV2Pair::swapCall {
                amount0Out: amount0_out,
                amount1Out: amount1_out,
                to,
                data: Bytes::new(),
            },
        )
    })
}

/// Single-pool exact-input swap through the shared router at the pool's own fee tier.
pub fn swap_v3(env: &mut HopEnv<'_, '_>, hop: &Hop, amount_in: U256) -> Result<U256, ZapError> {
    let token0 = env.view(hop.pool, IUniswapV3Pool::token0Call {})?;
    let token1 = env.view(hop.pool, IUniswapV3Pool::token1Call {})?;
    let fee = env.view(hop.pool, IUniswapV3Pool::feeCall {})?;
    let tokens = [token0, token1];
    let token_in = token_at(&tokens, hop.index_in, hop.pool)?;
    let token_out = token_at(&tokens, hop.index_out, hop.pool)?;
    let router = env.venues().uniswap_v3_router;

    env.measure(token_out, |env| {
        let value = env.fund(token_in, router, amount_in)?;
        let recipient = env.account();
        env.invoke(
            router,
            value,
            IUniswapV3Router::exactInputSingleCall {
                params: IUniswapV3Router::ExactInputSingleParams {
                    tokenIn: token_in,
                    tokenOut: token_out,
                    fee,
                    recipient,
                    deadline: U256::MAX,
                    amountIn: amount_in,
                    amountOutMinimum: U256::ZERO,
                    sqrtPriceLimitX96: U160::ZERO,
                },
            },
        )
    })
}
