// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@oxidity.com>

//! Offline replay of a zap against a configured fixture world.

use crate::app::config::{FixtureConfig, PoolFixture, ZapSettings};
use crate::common::constants::is_native;
use crate::domain::error::AppError;
use crate::infrastructure::host::contracts::{
    ConstantProductPair, IndexKind, StableSwapPool, StakedEther, WrappedStakedEther,
};
use crate::infrastructure::host::{Host, Ledger};
use crate::services::zap::{Invocation, SwapExecutor, Zap, ZapEvent};
use alloy::primitives::{Address, U256};
use serde::Serialize;
use std::sync::Arc;

#[derive(Debug, Clone, Copy)]
pub struct ReplayRequest {
    pub src: Address,
    pub dst: Address,
    pub amount_in: U256,
    pub min_out: U256,
    /// Run `zap_to` instead of `zap_from`.
    pub withdraw: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReplayOutcome {
    pub caller: Address,
    pub amount_out: U256,
    pub src_balance_after: U256,
    pub dst_balance_after: U256,
    pub events: Vec<ZapEvent>,
}

pub fn build_world(fixture: &FixtureConfig) -> Ledger {
    let mut ledger = Ledger::new();
    for pool in &fixture.pools {
        match pool {
            PoolFixture::UniswapV2 {
                address,
                token0,
                token1,
                reserve0,
                reserve1,
                fee_numerator,
            } => ConstantProductPair::new(*token0, *token1)
                .with_fee(*fee_numerator)
                .install(&mut ledger, *address, *reserve0, *reserve1),
            PoolFixture::Stableswap {
                address,
                coins,
                balances,
                lp_token,
                signed_indices,
                fee_bps,
            } => {
                let index_kind = if *signed_indices {
                    IndexKind::Int128
                } else {
                    IndexKind::Uint256
                };
                let pool = StableSwapPool::new(
                    coins.clone(),
                    lp_token.unwrap_or(*address),
                    index_kind,
                    *fee_bps,
                );
                StableSwapPool::deploy(&mut ledger, *address, pool, balances);
            }
            PoolFixture::Lido {
                steth,
                wsteth,
                steth_per_token,
                steth_reserve,
            } => {
                ledger.deploy(*steth, StakedEther);
                WrappedStakedEther::deploy(
                    &mut ledger,
                    *wsteth,
                    WrappedStakedEther::new(*steth, *steth_per_token),
                    *steth_reserve,
                );
            }
        }
    }
    for balance in &fixture.balances {
        ledger.mint(balance.token, balance.holder, balance.amount);
    }
    ledger
}

/// Facade with every configured route and receipt token installed by the owner.
pub fn build_zap(settings: &ZapSettings) -> Result<Zap, AppError> {
    let executor = Arc::new(SwapExecutor::new(settings.venues));
    let mut zap = Zap::new(settings.zap_address, settings.owner, executor);
    for route in &settings.routes {
        zap.update_route(settings.owner, route.src, route.dst, route.hops.clone())?;
    }
    if !settings.pool_tokens.is_empty() {
        let (pools, tokens): (Vec<Address>, Vec<Address>) = settings
            .pool_tokens
            .iter()
            .map(|entry| (entry.pool, entry.token))
            .unzip();
        zap.update_pool_tokens(settings.owner, &pools, &tokens)?;
    }
    // Setup events are not part of the replay.
    zap.drain_events();
    Ok(zap)
}

pub fn replay(settings: &ZapSettings, request: ReplayRequest) -> Result<ReplayOutcome, AppError> {
    let mut ledger = settings
        .fixture
        .as_ref()
        .map(build_world)
        .unwrap_or_default();
    let mut zap = build_zap(settings)?;
    let caller = settings.caller_or_owner();

    let mut invocation = Invocation::new(caller);
    if is_native(request.src) {
        invocation = invocation.with_value(request.amount_in);
    } else {
        ledger
            .approve(request.src, caller, zap.address(), request.amount_in)
            .map_err(|e| AppError::Initialization(e.to_string()))?;
    }

    tracing::info!(
        target: "zap",
        %caller,
        src = %request.src,
        dst = %request.dst,
        amount_in = %request.amount_in,
        withdraw = request.withdraw,
        "Replaying zap"
    );
    let amount_out = if request.withdraw {
        zap.zap_to(
            &mut ledger,
            invocation,
            request.src,
            request.amount_in,
            request.dst,
            request.min_out,
        )?
    } else {
        zap.zap_from(
            &mut ledger,
            invocation,
            request.src,
            request.amount_in,
            request.dst,
            request.min_out,
        )?
    };

    Ok(ReplayOutcome {
        caller,
        amount_out,
        src_balance_after: ledger.balance_of(request.src, caller),
        dst_balance_after: ledger.balance_of(request.dst, caller),
        events: zap.drain_events(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::config::{BalanceConfig, PoolTokenConfig, RouteConfig};
    use crate::services::zap::{Action, PoolType, RouteDescriptor, VenueBook};
    use alloy::primitives::address;

    const OWNER: Address = address!("0000000000000000000000000000000000000001");
    const PAIR: Address = address!("00000000000000000000000000000000000a00b0");
    const A: Address = address!("000000000000000000000000000000000000000a");
    const B: Address = address!("000000000000000000000000000000000000000b");

    fn settings() -> ZapSettings {
        let hop = RouteDescriptor::encode(PAIR, PoolType::UniswapV2, 2, 0, 1, Action::Swap, U256::ZERO)
            .unwrap();
        ZapSettings {
            debug: false,
            log_json: false,
            zap_address: address!("2a2a00000000000000000000000000000000000a"),
            owner: OWNER,
            caller: None,
            venues: VenueBook::mainnet(),
            routes: vec![RouteConfig {
                src: A,
                dst: B,
                hops: vec![hop],
            }],
            pool_tokens: vec![PoolTokenConfig {
                pool: PAIR,
                token: PAIR,
            }],
            fixture: Some(FixtureConfig {
                balances: vec![BalanceConfig {
                    token: A,
                    holder: OWNER,
                    amount: U256::from(1_000u64),
                }],
                pools: vec![PoolFixture::UniswapV2 {
                    address: PAIR,
                    token0: A,
                    token1: B,
                    reserve0: U256::from(1_000_000u64),
                    reserve1: U256::from(1_000_000u64),
                    fee_numerator: 997_000,
                }],
            }),
        }
    }

    #[test]
    fn replay_runs_the_configured_route() {
        let outcome = replay(
            &settings(),
            ReplayRequest {
                src: A,
                dst: B,
                amount_in: U256::from(1_000u64),
                min_out: U256::from(1u64),
                withdraw: false,
            },
        )
        .unwrap();
        // 0.3% fee against 1e6/1e6 reserves
        assert_eq!(outcome.amount_out, U256::from(996u64));
        assert_eq!(outcome.dst_balance_after, outcome.amount_out);
        assert!(outcome.src_balance_after.is_zero());
        assert_eq!(outcome.events.len(), 1);
    }

    #[test]
    fn replay_surfaces_slippage_as_app_error() {
        let err = replay(
            &settings(),
            ReplayRequest {
                src: A,
                dst: B,
                amount_in: U256::from(1_000u64),
                min_out: U256::from(1_000u64),
                withdraw: false,
            },
        )
        .unwrap_err();
        assert!(matches!(err, AppError::Zap(_)));
    }
}
