// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@oxidity.com>

use crate::common::error::ZapError;
use crate::infrastructure::data::abi::{ILidoStETH, IWstETH};
use crate::services::zap::adapters::HopEnv;
use crate::services::zap::descriptor::{Action, Hop};
use alloy::primitives::{Address, U256};

/// Native asset into stETH. The descriptor pool is the stETH contract itself.
pub fn stake(env: &mut HopEnv<'_, '_>, hop: &Hop, amount_in: U256) -> Result<U256, ZapError> {
    let steth = hop.pool;
    env.measure(steth, |env| {
        env.invoke(
            steth,
            amount_in,
            ILidoStETH::submitCall {
                referral: Address::ZERO,
            },
        )
    })
}

/// stETH into wstETH (add) and back (remove). The descriptor pool is wstETH.
pub fn wrap_or_unwrap(
    env: &mut HopEnv<'_, '_>,
    hop: &Hop,
    amount_in: U256,
) -> Result<U256, ZapError> {
    let wsteth = hop.pool;
    let steth = env.view(wsteth, IWstETH::stETHCall {})?;
    match hop.action {
        Action::AddLiquidity => env.measure(wsteth, |env| {
            env.fund(steth, wsteth, amount_in)?;
            env.invoke(
                wsteth,
                U256::ZERO,
                IWstETH::wrapCall {
                    stETHAmount: amount_in,
                },
            )
        }),
        Action::RemoveLiquidity => env.measure(steth, |env| {
            env.invoke(
                wsteth,
                U256::ZERO,
                IWstETH::unwrapCall {
                    wstETHAmount: amount_in,
                },
            )
        }),
        Action::Swap => Err(ZapError::config(format!(
            "wstETH at {wsteth} cannot swap; use add or remove liquidity"
        ))),
    }
}
