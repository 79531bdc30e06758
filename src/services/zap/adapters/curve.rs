// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@oxidity.com>

//! Curve pools, deposit zaps and factory metapools.
//!
//! Curve has shipped the same function names with different index types, array
//! arities and trailing flags across generations. Each family's choices are captured
//! once in a [`Convention`]; the execution path below is shared.

use crate::common::constants::is_native;
use crate::common::error::ZapError;
use crate::infrastructure::data::abi::{
    ICurveFactoryMetaZap, ICurveFlaggedRemove, ICurveInt128Pool, ICurveLegacyViews,
    ICurveLendingPool2, ICurveLendingPool3, ICurveLendingPool4, ICurvePool2, ICurvePool3,
    ICurvePool4, ICurveTriCryptoPool, ICurveUint256Pool, ICurveViews,
};
use crate::services::zap::adapters::{HopEnv, receipt_token_or};
use crate::services::zap::descriptor::{Action, Hop};
use alloy::primitives::{Address, U256};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CurveFamily {
    Eth,
    Crypto,
    MetaCrypto,
    TriCrypto,
    Base,
    Lending,
    LendingUnderlying,
    Y,
    YUnderlying,
    Meta,
    MetaUnderlying,
    FactoryPlain,
    FactoryMeta,
    FactoryUsdMetaUnderlying,
    FactoryBtcMetaUnderlying,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetaZapVenue {
    Usd,
    Btc,
}

/// Where the address of coin `i` comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CoinSource {
    Coins,
    LegacyCoins,
    UnderlyingCoins,
    LegacyUnderlyingCoins,
    /// Deposit zap: `coins(0)` is the metapool coin, the rest are `base_coins(i - 1)`.
    ZapBaseCoins,
    /// Factory metapool: `coins(0)` on the pool, the rest from the venue base pool.
    FactoryBaseCoins(MetaZapVenue),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ExchangeTarget {
    Pool,
    /// Deposit zap exposing the swapping pool through `curve()`.
    CurveView,
    /// Deposit zap exposing the swapping pool through `pool()`.
    PoolView,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Exchange {
    Int128,
    Int128Underlying,
    Uint256,
    Uint256Underlying,
    TriCrypto,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AddLiquidity {
    Plain,
    Lending { use_underlying: bool },
    FactoryZap(MetaZapVenue),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RemoveLiquidity {
    Int128,
    Uint256,
    Flagged(bool),
    FactoryZap(MetaZapVenue),
    Unsupported,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ReceiptDefault {
    Pool,
    TokenView,
    RegistryOnly,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Convention {
    coins: CoinSource,
    target: ExchangeTarget,
    exchange: Exchange,
    add: AddLiquidity,
    remove: RemoveLiquidity,
    receipt: ReceiptDefault,
}

impl CurveFamily {
    const fn convention(self) -> Convention {
        use CoinSource as C;
        use ExchangeTarget as T;
        use ReceiptDefault as R;
        let plain = Convention {
            coins: C::Coins,
            target: T::Pool,
            exchange: Exchange::Int128,
            add: AddLiquidity::Plain,
            remove: RemoveLiquidity::Int128,
            receipt: R::RegistryOnly,
        };
        match self {
            CurveFamily::Eth | CurveFamily::Base | CurveFamily::Meta => plain,
            CurveFamily::Crypto => Convention {
                exchange: Exchange::Uint256,
                remove: RemoveLiquidity::Uint256,
                receipt: R::TokenView,
                ..plain
            },
            CurveFamily::MetaCrypto => Convention {
                coins: C::UnderlyingCoins,
                exchange: Exchange::Uint256Underlying,
                remove: RemoveLiquidity::Uint256,
                receipt: R::TokenView,
                ..plain
            },
            CurveFamily::TriCrypto => Convention {
                exchange: Exchange::TriCrypto,
                remove: RemoveLiquidity::Uint256,
                receipt: R::TokenView,
                ..plain
            },
            CurveFamily::Lending => Convention {
                add: AddLiquidity::Lending {
                    use_underlying: false,
                },
                remove: RemoveLiquidity::Flagged(false),
                ..plain
            },
            CurveFamily::LendingUnderlying => Convention {
                coins: C::UnderlyingCoins,
                exchange: Exchange::Int128Underlying,
                add: AddLiquidity::Lending {
                    use_underlying: true,
                },
                remove: RemoveLiquidity::Flagged(true),
                ..plain
            },
            CurveFamily::Y => Convention {
                coins: C::LegacyCoins,
                remove: RemoveLiquidity::Unsupported,
                ..plain
            },
            CurveFamily::YUnderlying => Convention {
                coins: C::LegacyUnderlyingCoins,
                target: T::CurveView,
                exchange: Exchange::Int128Underlying,
                remove: RemoveLiquidity::Flagged(false),
                receipt: R::TokenView,
                ..plain
            },
            CurveFamily::MetaUnderlying => Convention {
                coins: C::ZapBaseCoins,
                target: T::PoolView,
                exchange: Exchange::Int128Underlying,
                receipt: R::TokenView,
                ..plain
            },
            CurveFamily::FactoryPlain | CurveFamily::FactoryMeta => Convention {
                receipt: R::Pool,
                ..plain
            },
            CurveFamily::FactoryUsdMetaUnderlying => Convention {
                coins: C::FactoryBaseCoins(MetaZapVenue::Usd),
                exchange: Exchange::Int128Underlying,
                add: AddLiquidity::FactoryZap(MetaZapVenue::Usd),
                remove: RemoveLiquidity::FactoryZap(MetaZapVenue::Usd),
                receipt: R::Pool,
                ..plain
            },
            CurveFamily::FactoryBtcMetaUnderlying => Convention {
                coins: C::FactoryBaseCoins(MetaZapVenue::Btc),
                exchange: Exchange::Int128Underlying,
                add: AddLiquidity::FactoryZap(MetaZapVenue::Btc),
                remove: RemoveLiquidity::FactoryZap(MetaZapVenue::Btc),
                receipt: R::Pool,
                ..plain
            },
        }
    }
}

fn meta_zap(env: &HopEnv<'_, '_>, venue: MetaZapVenue) -> Address {
    match venue {
        MetaZapVenue::Usd => env.venues().curve_usd_meta_zap,
        MetaZapVenue::Btc => env.venues().curve_btc_meta_zap,
    }
}

fn base_pool(env: &HopEnv<'_, '_>, venue: MetaZapVenue) -> Address {
    match venue {
        MetaZapVenue::Usd => env.venues().curve_usd_base_pool,
        MetaZapVenue::Btc => env.venues().curve_btc_base_pool,
    }
}

fn coin(
    env: &mut HopEnv<'_, '_>,
    source: CoinSource,
    pool: Address,
    index: u8,
) -> Result<Address, ZapError> {
    let i = U256::from(index);
    let legacy = i128::from(index);
    match source {
        CoinSource::Coins => env.view(pool, ICurveViews::coinsCall { i }),
        CoinSource::LegacyCoins => env.view(pool, ICurveLegacyViews::coinsCall { i: legacy }),
        CoinSource::UnderlyingCoins => env.view(pool, ICurveViews::underlying_coinsCall { i }),
        CoinSource::LegacyUnderlyingCoins => {
            env.view(pool, ICurveLegacyViews::underlying_coinsCall { i: legacy })
        }
        CoinSource::ZapBaseCoins if index == 0 => env.view(pool, ICurveViews::coinsCall { i }),
        CoinSource::ZapBaseCoins => env.view(
            pool,
            ICurveViews::base_coinsCall {
                i: U256::from(index - 1),
            },
        ),
        CoinSource::FactoryBaseCoins(_) if index == 0 => {
            env.view(pool, ICurveViews::coinsCall { i })
        }
        CoinSource::FactoryBaseCoins(venue) => {
            let base = base_pool(env, venue);
            env.view(
                base,
                ICurveViews::coinsCall {
                    i: U256::from(index - 1),
                },
            )
        }
    }
}

fn receipt_token(
    env: &mut HopEnv<'_, '_>,
    default: ReceiptDefault,
    pool: Address,
) -> Result<Address, ZapError> {
    receipt_token_or(env, pool, |env| match default {
        ReceiptDefault::Pool => Ok(Some(pool)),
        ReceiptDefault::TokenView => env.view(pool, ICurveViews::tokenCall {}).map(Some),
        ReceiptDefault::RegistryOnly => Ok(None),
    })
}

fn one_hot<const N: usize>(index: u8, amount: U256) -> Result<[U256; N], ZapError> {
    let mut amounts = [U256::ZERO; N];
    let slot = amounts.get_mut(usize::from(index)).ok_or_else(|| {
        ZapError::config(format!("index {index} out of range for {N} pool tokens"))
    })?;
    *slot = amount;
    Ok(amounts)
}

pub fn execute(
    family: CurveFamily,
    env: &mut HopEnv<'_, '_>,
    hop: &Hop,
    amount_in: U256,
) -> Result<U256, ZapError> {
    let convention = family.convention();
    match hop.action {
        Action::Swap => swap(env, convention, hop, amount_in),
        Action::AddLiquidity => add_liquidity(env, convention, hop, amount_in),
        Action::RemoveLiquidity => remove_liquidity(env, convention, hop, amount_in),
    }
}

fn swap(
    env: &mut HopEnv<'_, '_>,
    convention: Convention,
    hop: &Hop,
    amount_in: U256,
) -> Result<U256, ZapError> {
    let token_in = coin(env, convention.coins, hop.pool, hop.index_in)?;
    let token_out = coin(env, convention.coins, hop.pool, hop.index_out)?;
    let target = match convention.target {
        ExchangeTarget::Pool => hop.pool,
        ExchangeTarget::CurveView => env.view(hop.pool, ICurveViews::curveCall {})?,
        ExchangeTarget::PoolView => env.view(hop.pool, ICurveViews::poolCall {})?,
    };

    let (i, j) = (hop.index_in, hop.index_out);
    // Tricrypto pools only move native ETH when asked to; otherwise they settle in WETH.
    let use_eth = is_native(token_in) || is_native(token_out);
    env.measure(token_out, |env| {
        let value = env.fund(token_in, target, amount_in)?;
        match convention.exchange {
            Exchange::Int128 => env.invoke(
                target,
                value,
                ICurveInt128Pool::exchangeCall {
                    i: i.into(),
                    j: j.into(),
                    dx: amount_in,
                    min_dy: U256::ZERO,
                },
            ),
            Exchange::Int128Underlying => env.invoke(
                target,
                value,
                ICurveInt128Pool::exchange_underlyingCall {
                    i: i.into(),
                    j: j.into(),
                    dx: amount_in,
                    min_dy: U256::ZERO,
                },
            ),
            Exchange::Uint256 => env.invoke(
                target,
                value,
                ICurveUint256Pool::exchangeCall {
                    i: U256::from(i),
                    j: U256::from(j),
                    dx: amount_in,
                    min_dy: U256::ZERO,
                },
            ),
            Exchange::Uint256Underlying => env.invoke(
                target,
                value,
                ICurveUint256Pool::exchange_underlyingCall {
                    i: U256::from(i),
                    j: U256::from(j),
                    dx: amount_in,
                    min_dy: U256::ZERO,
                },
            ),
            Exchange::TriCrypto => env.invoke(
                target,
                value,
                ICurveTriCryptoPool::exchangeCall {
                    i: U256::from(i),
                    j: U256::from(j),
                    dx: amount_in,
                    min_dy: U256::ZERO,
                    use_eth,
                },
            ),
        }
    })
}

fn add_liquidity(
    env: &mut HopEnv<'_, '_>,
    convention: Convention,
    hop: &Hop,
    amount_in: U256,
) -> Result<U256, ZapError> {
    let token_in = coin(env, convention.coins, hop.pool, hop.index_in)?;
    let lp = receipt_token(env, convention.receipt, hop.pool)?;
    let target = match convention.add {
        AddLiquidity::FactoryZap(venue) => meta_zap(env, venue),
        AddLiquidity::Plain | AddLiquidity::Lending { .. } => hop.pool,
    };
    let index = hop.index_in;
    let min_mint_amount = U256::ZERO;

    env.measure(lp, |env| {
        let value = env.fund(token_in, target, amount_in)?;
        match (convention.add, hop.token_count) {
            (AddLiquidity::Plain, 2) => env.invoke(
                target,
                value,
                ICurvePool2::add_liquidityCall {
                    amounts: one_hot(index, amount_in)?,
                    min_mint_amount,
                },
            ),
            (AddLiquidity::Plain, 3) => env.invoke(
                target,
                value,
                ICurvePool3::add_liquidityCall {
                    amounts: one_hot(index, amount_in)?,
                    min_mint_amount,
                },
            ),
            (AddLiquidity::Plain, 4) => env.invoke(
                target,
                value,
                ICurvePool4::add_liquidityCall {
                    amounts: one_hot(index, amount_in)?,
                    min_mint_amount,
                },
            ),
            (AddLiquidity::Lending { use_underlying }, 2) => env.invoke(
                target,
                value,
                ICurveLendingPool2::add_liquidityCall {
                    amounts: one_hot(index, amount_in)?,
                    min_mint_amount,
                    use_underlying,
                },
            ),
            (AddLiquidity::Lending { use_underlying }, 3) => env.invoke(
                target,
                value,
                ICurveLendingPool3::add_liquidityCall {
                    amounts: one_hot(index, amount_in)?,
                    min_mint_amount,
                    use_underlying,
                },
            ),
            (AddLiquidity::Lending { use_underlying }, 4) => env.invoke(
                target,
                value,
                ICurveLendingPool4::add_liquidityCall {
                    amounts: one_hot(index, amount_in)?,
                    min_mint_amount,
                    use_underlying,
                },
            ),
            (AddLiquidity::FactoryZap(_), 4) => env.invoke(
                target,
                value,
                ICurveFactoryMetaZap::add_liquidityCall {
                    pool: hop.pool,
                    deposit_amounts: one_hot(index, amount_in)?,
                    min_mint_amount,
                },
            ),
            (_, count) => Err(ZapError::config(format!(
                "curve pool {} cannot add liquidity with {count} tokens",
                hop.pool
            ))),
        }
    })
}

fn remove_liquidity(
    env: &mut HopEnv<'_, '_>,
    convention: Convention,
    hop: &Hop,
    amount_in: U256,
) -> Result<U256, ZapError> {
    if convention.remove == RemoveLiquidity::Unsupported {
        return Err(ZapError::config(format!(
            "curve pool {} does not support remove liquidity",
            hop.pool
        )));
    }
    let token_out = coin(env, convention.coins, hop.pool, hop.index_out)?;
    let lp = receipt_token(env, convention.receipt, hop.pool)?;
    let target = match convention.remove {
        RemoveLiquidity::FactoryZap(venue) => meta_zap(env, venue),
        _ => hop.pool,
    };
    let index = hop.index_out;
    let min_amount = U256::ZERO;

    env.measure(token_out, |env| {
        env.fund(lp, target, amount_in)?;
        match convention.remove {
            RemoveLiquidity::Int128 => env.invoke(
                target,
                U256::ZERO,
                ICurveInt128Pool::remove_liquidity_one_coinCall {
                    token_amount: amount_in,
                    i: index.into(),
                    min_amount,
                },
            ),
            RemoveLiquidity::Uint256 => env.invoke(
                target,
                U256::ZERO,
                ICurveUint256Pool::remove_liquidity_one_coinCall {
                    token_amount: amount_in,
                    i: U256::from(index),
                    min_amount,
                },
            ),
            RemoveLiquidity::Flagged(flag) => env.invoke(
                target,
                U256::ZERO,
                ICurveFlaggedRemove::remove_liquidity_one_coinCall {
                    token_amount: amount_in,
                    i: index.into(),
                    min_amount,
                    flag,
                },
            ),
            RemoveLiquidity::FactoryZap(_) => env.invoke(
                target,
                U256::ZERO,
                ICurveFactoryMetaZap::remove_liquidity_one_coinCall {
                    pool: hop.pool,
                    burn_amount: amount_in,
                    i: index.into(),
                    min_amount,
                },
            ),
            RemoveLiquidity::Unsupported => Err(ZapError::config("remove liquidity unsupported")),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::constants::NATIVE_ASSET;
    use crate::infrastructure::host::Host;
    use crate::infrastructure::host::contracts::{IndexKind, StableSwapPool};
    use crate::services::zap::adapters::testing::{Canned, RecordingHost};
    use crate::services::zap::adapters::{ExecutionContext, PoolAdapter};
    use crate::services::zap::descriptor::PoolType;
    use crate::services::zap::venues::VenueBook;
    use alloy::primitives::address;
    use alloy_sol_types::{SolCall, SolValue};
    use std::collections::HashMap;

    const ACCOUNT: Address = address!("2a2a000000000000000000000000000000000001");
    const POOL: Address = address!("00000000000000000000000000000000000c0e01");
    const LP: Address = address!("00000000000000000000000000000000000c0e02");
    const DAI: Address = address!("6B175474E89094C44Da98b954EedeAC495271d0F");
    const USDC: Address = address!("A0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48");
    const USDT: Address = address!("dAC17F958D2ee523a2206206994597C13D831ec7");

    fn hop(pool_type: PoolType, action: Action, count: u8, index_in: u8, index_out: u8) -> Hop {
        Hop {
            pool: POOL,
            pool_type,
            token_count: count,
            index_in,
            index_out,
            action,
            metadata: U256::ZERO,
        }
    }

    fn run(
        host: &mut RecordingHost,
        receipts: &HashMap<Address, Address>,
        hop: &Hop,
        amount_in: U256,
    ) -> Result<U256, ZapError> {
        let venues = VenueBook::mainnet();
        let mut ctx = ExecutionContext::new(host, ACCOUNT, receipts);
        let mut env = HopEnv::new(&mut ctx, &venues);
        PoolAdapter::for_pool_type(hop.pool_type).execute(&mut env, hop, amount_in)
    }

    fn stableswap(host: &mut RecordingHost, coins: Vec<Address>, kind: IndexKind) {
        let balances = vec![U256::from(1_000_000u64); coins.len()];
        StableSwapPool::deploy(
            &mut host.ledger,
            POOL,
            StableSwapPool::new(coins, LP, kind, 4),
            &balances,
        );
    }

    #[test]
    fn base_pool_swaps_with_int128_indices() {
        let mut host = RecordingHost::default();
        stableswap(&mut host, vec![DAI, USDC, USDT], IndexKind::Int128);
        host.ledger.mint(USDT, ACCOUNT, U256::from(10_000u64));

        let out = run(
            &mut host,
            &HashMap::new(),
            &hop(PoolType::CurveBasePool, Action::Swap, 3, 2, 0),
            U256::from(10_000u64),
        )
        .unwrap();

        assert_eq!(out, U256::from(9_996u64));
        let call = ICurveInt128Pool::exchangeCall::abi_decode(&host.last_call().data).unwrap();
        assert_eq!((call.i, call.j), (2, 0));
        assert!(call.min_dy.is_zero());
        assert_eq!(host.ledger.balance_of(DAI, ACCOUNT), U256::from(9_996u64));
    }

    #[test]
    fn crypto_pool_uses_uint256_indices_and_token_view() {
        let mut host = RecordingHost::default();
        stableswap(&mut host, vec![DAI, USDC], IndexKind::Uint256);
        host.ledger.mint(USDC, ACCOUNT, U256::from(500u64));

        let minted = run(
            &mut host,
            &HashMap::new(),
            &hop(PoolType::CurveCryptoPool, Action::AddLiquidity, 2, 1, 0),
            U256::from(500u64),
        )
        .unwrap();
        assert_eq!(minted, U256::from(499u64));
        let add = ICurvePool2::add_liquidityCall::abi_decode(&host.last_call().data).unwrap();
        assert_eq!(add.amounts, [U256::ZERO, U256::from(500u64)]);

        let out = run(
            &mut host,
            &HashMap::new(),
            &hop(PoolType::CurveCryptoPool, Action::RemoveLiquidity, 2, 0, 0),
            minted,
        )
        .unwrap();
        assert!(!out.is_zero());
        let remove =
            ICurveUint256Pool::remove_liquidity_one_coinCall::abi_decode(&host.last_call().data)
                .unwrap();
        assert_eq!(remove.i, U256::ZERO);
        assert_eq!(remove.token_amount, minted);
        assert!(host.ledger.balance_of(LP, ACCOUNT).is_zero());
    }

    #[test]
    fn eth_pool_attaches_native_value() {
        let mut host = RecordingHost::default();
        let steth = address!("ae7ab96520DE3A18E5e111B5EaAb095312D7fE84");
        stableswap(&mut host, vec![NATIVE_ASSET, steth], IndexKind::Int128);
        host.ledger.mint(NATIVE_ASSET, ACCOUNT, U256::from(1_000u64));

        let out = run(
            &mut host,
            &HashMap::new(),
            &hop(PoolType::CurveETHPool, Action::Swap, 2, 0, 1),
            U256::from(1_000u64),
        )
        .unwrap();
        assert_eq!(out, U256::from(999u64));
        assert_eq!(host.last_call().value, U256::from(1_000u64));
        assert!(host.approvals.is_empty());
        assert!(host.ledger.balance_of(NATIVE_ASSET, ACCOUNT).is_zero());
    }

    #[test]
    fn base_pool_liquidity_needs_a_registered_receipt_token() {
        let mut host = RecordingHost::default();
        stableswap(&mut host, vec![DAI, USDC, USDT], IndexKind::Int128);
        host.ledger.mint(DAI, ACCOUNT, U256::from(100u64));
        let add = hop(PoolType::CurveBasePool, Action::AddLiquidity, 3, 0, 0);

        let err = run(&mut host, &HashMap::new(), &add, U256::from(100u64)).unwrap_err();
        assert!(err.is_configuration());
        assert!(host.calls.is_empty());

        let receipts = HashMap::from([(POOL, LP)]);
        let minted = run(&mut host, &receipts, &add, U256::from(100u64)).unwrap();
        assert_eq!(minted, U256::from(99u64));
        let call = ICurvePool3::add_liquidityCall::abi_decode(&host.last_call().data).unwrap();
        assert_eq!(call.amounts, [U256::from(100u64), U256::ZERO, U256::ZERO]);
    }

    #[test]
    fn lending_pools_pass_use_underlying() {
        let mut host = RecordingHost::default();
        host.ledger.deploy(
            POOL,
            Canned::default()
                .with(ICurveViews::coinsCall::SELECTOR, DAI.abi_encode())
                .with(ICurveViews::underlying_coinsCall::SELECTOR, USDC.abi_encode()),
        );
        let receipts = HashMap::from([(POOL, LP)]);

        run(
            &mut host,
            &receipts,
            &hop(PoolType::CurveAPool, Action::AddLiquidity, 3, 1, 0),
            U256::from(5u64),
        )
        .unwrap();
        let plain =
            ICurveLendingPool3::add_liquidityCall::abi_decode(&host.last_call().data).unwrap();
        assert!(!plain.use_underlying);
        assert_eq!(plain.amounts[1], U256::from(5u64));

        run(
            &mut host,
            &receipts,
            &hop(PoolType::CurveAPoolUnderlying, Action::RemoveLiquidity, 3, 0, 2),
            U256::from(5u64),
        )
        .unwrap();
        let remove =
            ICurveFlaggedRemove::remove_liquidity_one_coinCall::abi_decode(&host.last_call().data)
                .unwrap();
        assert!(remove.flag);
        assert_eq!(remove.i, 2);

        run(
            &mut host,
            &receipts,
            &hop(PoolType::CurveAPoolUnderlying, Action::Swap, 3, 0, 1),
            U256::from(5u64),
        )
        .unwrap();
        assert_eq!(
            host.selectors().last(),
            Some(&ICurveInt128Pool::exchange_underlyingCall::SELECTOR)
        );
        assert_eq!(host.approvals.last(), Some(&(USDC, POOL, U256::from(5u64))));
    }

    #[test]
    fn y_deposit_zap_swaps_on_its_curve_pool() {
        let swap_pool = address!("00000000000000000000000000000000000c0e99");
        let mut host = RecordingHost::default();
        host.ledger.deploy(
            POOL,
            Canned::default()
                .with(ICurveLegacyViews::underlying_coinsCall::SELECTOR, DAI.abi_encode())
                .with(ICurveViews::curveCall::SELECTOR, swap_pool.abi_encode()),
        );
        host.ledger.deploy(swap_pool, Canned::default());

        run(
            &mut host,
            &HashMap::new(),
            &hop(PoolType::CurveYPoolUnderlying, Action::Swap, 4, 0, 3),
            U256::from(9u64),
        )
        .unwrap();
        let call = host.last_call();
        assert_eq!(call.target, swap_pool);
        let decoded = ICurveInt128Pool::exchange_underlyingCall::abi_decode(&call.data).unwrap();
        assert_eq!((decoded.i, decoded.j), (0, 3));
    }

    #[test]
    fn y_pool_refuses_remove_liquidity() {
        let mut host = RecordingHost::default();
        let err = run(
            &mut host,
            &HashMap::from([(POOL, LP)]),
            &hop(PoolType::CurveYPool, Action::RemoveLiquidity, 4, 0, 1),
            U256::from(1u64),
        )
        .unwrap_err();
        assert!(err.is_configuration());
        assert!(host.calls.is_empty());
    }

    #[test]
    fn tricrypto_sets_use_eth_only_when_native_moves() {
        let mut host = RecordingHost::default();
        stableswap(&mut host, vec![USDT, DAI, NATIVE_ASSET], IndexKind::Uint256);
        host.ledger.mint(NATIVE_ASSET, ACCOUNT, U256::from(1_000u64));

        let usdt = run(
            &mut host,
            &HashMap::new(),
            &hop(PoolType::CurveTriCryptoPool, Action::Swap, 3, 2, 0),
            U256::from(1_000u64),
        )
        .unwrap();
        assert_eq!(usdt, U256::from(999u64));
        let eth_in = host.last_call().clone();
        assert_eq!(eth_in.value, U256::from(1_000u64));
        let call = ICurveTriCryptoPool::exchangeCall::abi_decode(&eth_in.data).unwrap();
        assert!(call.use_eth);
        assert_eq!((call.i, call.j), (U256::from(2u64), U256::ZERO));
        assert!(host.approvals.is_empty());

        let dai = run(
            &mut host,
            &HashMap::new(),
            &hop(PoolType::CurveTriCryptoPool, Action::Swap, 3, 0, 1),
            U256::from(500u64),
        )
        .unwrap();
        assert_eq!(dai, U256::from(499u64));
        let call = ICurveTriCryptoPool::exchangeCall::abi_decode(&host.last_call().data).unwrap();
        assert!(!call.use_eth);
        assert!(host.last_call().value.is_zero());

        let eth = run(
            &mut host,
            &HashMap::new(),
            &hop(PoolType::CurveTriCryptoPool, Action::Swap, 3, 1, 2),
            dai,
        )
        .unwrap();
        let call = ICurveTriCryptoPool::exchangeCall::abi_decode(&host.last_call().data).unwrap();
        assert!(call.use_eth);
        assert_eq!(eth, U256::from(498u64));
        assert_eq!(host.ledger.balance_of(NATIVE_ASSET, ACCOUNT), eth);
    }

    #[test]
    fn tricrypto_pool_refuses_native_without_use_eth() {
        let mut host = RecordingHost::default();
        stableswap(&mut host, vec![USDT, DAI, NATIVE_ASSET], IndexKind::Uint256);
        host.ledger.mint(USDT, ACCOUNT, U256::from(10u64));
        host.ledger
            .approve(USDT, ACCOUNT, POOL, U256::from(10u64))
            .unwrap();

        let data = ICurveTriCryptoPool::exchangeCall {
            i: U256::ZERO,
            j: U256::from(2u64),
            dx: U256::from(10u64),
            min_dy: U256::ZERO,
            use_eth: false,
        }
        .abi_encode();
        let err = host.call(ACCOUNT, POOL, U256::ZERO, &data).unwrap_err();
        assert!(err.to_string().contains("use_eth"));
        assert_eq!(host.ledger.balance_of(USDT, ACCOUNT), U256::from(10u64));
    }

    #[test]
    fn factory_underlying_liquidity_goes_through_the_meta_zap() {
        let venues = VenueBook::mainnet();
        let mut host = RecordingHost::default();
        host.ledger.deploy(
            POOL,
            Canned::default().with(ICurveViews::coinsCall::SELECTOR, DAI.abi_encode()),
        );
        host.ledger.deploy(
            venues.curve_usd_base_pool,
            Canned::default().with(ICurveViews::coinsCall::SELECTOR, USDT.abi_encode()),
        );
        host.ledger.deploy(venues.curve_usd_meta_zap, Canned::default());

        run(
            &mut host,
            &HashMap::new(),
            &hop(
                PoolType::CurveFactoryUSDMetaPoolUnderlying,
                Action::AddLiquidity,
                4,
                3,
                0,
            ),
            U256::from(42u64),
        )
        .unwrap();
        let call = host.last_call();
        assert_eq!(call.target, venues.curve_usd_meta_zap);
        let add = ICurveFactoryMetaZap::add_liquidityCall::abi_decode(&call.data).unwrap();
        assert_eq!(add.pool, POOL);
        assert_eq!(add.deposit_amounts[3], U256::from(42u64));
        // Underlying coin 3 resolves through the base pool.
        assert_eq!(
            host.approvals.last(),
            Some(&(USDT, venues.curve_usd_meta_zap, U256::from(42u64)))
        );

        run(
            &mut host,
            &HashMap::new(),
            &hop(
                PoolType::CurveFactoryUSDMetaPoolUnderlying,
                Action::RemoveLiquidity,
                4,
                0,
                1,
            ),
            U256::from(7u64),
        )
        .unwrap();
        let remove = ICurveFactoryMetaZap::remove_liquidity_one_coinCall::abi_decode(
            &host.last_call().data,
        )
        .unwrap();
        assert_eq!(remove.pool, POOL);
        assert_eq!(remove.i, 1);
        // Factory pools are their own LP token.
        assert_eq!(
            host.approvals.last(),
            Some(&(POOL, venues.curve_usd_meta_zap, U256::from(7u64)))
        );
    }

    #[test]
    fn meta_deposit_zap_resolves_base_coins_and_swaps_on_pool() {
        let meta_pool = address!("00000000000000000000000000000000000c0e77");
        let mut host = RecordingHost::default();
        host.ledger.deploy(
            POOL,
            Canned::default()
                .with(ICurveViews::coinsCall::SELECTOR, DAI.abi_encode())
                .with(ICurveViews::base_coinsCall::SELECTOR, USDC.abi_encode())
                .with(ICurveViews::poolCall::SELECTOR, meta_pool.abi_encode()),
        );
        host.ledger.deploy(meta_pool, Canned::default());

        run(
            &mut host,
            &HashMap::new(),
            &hop(PoolType::CurveMetaPoolUnderlying, Action::Swap, 4, 2, 0),
            U256::from(1u64),
        )
        .unwrap();
        assert_eq!(host.last_call().target, meta_pool);
        assert_eq!(host.approvals.last(), Some(&(USDC, meta_pool, U256::from(1u64))));
    }

    #[test]
    fn metadata_does_not_change_curve_calls() {
        let saturated = (U256::from(1u64) << 80usize) - U256::from(1u64);
        let mut results = Vec::new();
        for metadata in [U256::ZERO, saturated] {
            let mut host = RecordingHost::default();
            stableswap(&mut host, vec![DAI, USDC, USDT], IndexKind::Int128);
            host.ledger.mint(USDT, ACCOUNT, U256::from(10_000u64));
            let mut swap = hop(PoolType::CurveBasePool, Action::Swap, 3, 2, 0);
            swap.metadata = metadata;
            let out = run(&mut host, &HashMap::new(), &swap, U256::from(10_000u64)).unwrap();
            results.push((out, host.last_call().data.clone()));
        }
        assert_eq!(results[0], results[1]);
        assert_eq!(results[0].0, U256::from(9_996u64));
    }

    #[test]
    fn lending_deposit_counts_lp_received_not_lp_reported() {
        let mut host = RecordingHost::default();
        host.ledger.deploy(
            POOL,
            Canned::default()
                .with(ICurveViews::coinsCall::SELECTOR, DAI.abi_encode())
                .paying(LP, U256::from(60u64), U256::from(1_000_000_000u64).abi_encode()),
        );
        host.ledger.mint(LP, POOL, U256::from(60u64));
        let receipts = HashMap::from([(POOL, LP)]);

        let minted = run(
            &mut host,
            &receipts,
            &hop(PoolType::CurveAPool, Action::AddLiquidity, 3, 1, 0),
            U256::from(5u64),
        )
        .unwrap();
        assert_eq!(minted, U256::from(60u64));
        assert_eq!(host.ledger.balance_of(LP, ACCOUNT), minted);
    }

    #[test]
    fn meta_deposit_zap_swap_counts_tokens_received() {
        let meta_pool = address!("00000000000000000000000000000000000c0e77");
        let mut host = RecordingHost::default();
        host.ledger.deploy(
            POOL,
            Canned::default()
                .with(ICurveViews::coinsCall::SELECTOR, DAI.abi_encode())
                .with(ICurveViews::base_coinsCall::SELECTOR, USDC.abi_encode())
                .with(ICurveViews::poolCall::SELECTOR, meta_pool.abi_encode()),
        );
        host.ledger.deploy(
            meta_pool,
            Canned::default().paying(DAI, U256::from(11u64), U256::from(900u64).abi_encode()),
        );
        host.ledger.mint(DAI, meta_pool, U256::from(11u64));

        let out = run(
            &mut host,
            &HashMap::new(),
            &hop(PoolType::CurveMetaPoolUnderlying, Action::Swap, 4, 2, 0),
            U256::from(1u64),
        )
        .unwrap();
        assert_eq!(out, U256::from(11u64));
        assert_eq!(host.ledger.balance_of(DAI, ACCOUNT), out);
    }

    #[test]
    fn one_hot_rejects_slots_past_the_array() {
        let amounts: [U256; 3] = one_hot(2, U256::from(7u64)).unwrap();
        assert_eq!(amounts, [U256::ZERO, U256::ZERO, U256::from(7u64)]);
        let err = one_hot::<2>(3, U256::from(7u64)).unwrap_err();
        assert!(err.is_configuration());
    }
}
