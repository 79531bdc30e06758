// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@oxidity.com>

//! Pool adapters: one calling convention per pool family.
//!
//! Every adapter measures its output as the balance delta of the executing account;
//! return values of pool calls are never trusted.

pub mod balancer;
pub mod curve;
pub mod lido;
pub mod uniswap;

pub use curve::CurveFamily;

use crate::common::constants::is_native;
use crate::common::error::ZapError;
use crate::infrastructure::host::Host;
use crate::services::zap::descriptor::{Hop, PoolType};
use crate::services::zap::venues::VenueBook;
use alloy::primitives::{Address, U256};
use alloy_sol_types::SolCall;
use std::collections::HashMap;

/// Pool → receipt-token lookups consulted before any family default.
pub trait ReceiptTokenLookup {
    fn receipt_token(&self, pool: Address) -> Option<Address>;
}

impl ReceiptTokenLookup for HashMap<Address, Address> {
    fn receipt_token(&self, pool: Address) -> Option<Address> {
        self.get(&pool).copied()
    }
}

/// Per-call state shared by every hop of a route.
pub struct ExecutionContext<'a> {
    pub host: &'a mut dyn Host,
    /// Holds route balances between hops and makes every pool call.
    pub account: Address,
    pub receipts: &'a dyn ReceiptTokenLookup,
}

impl<'a> ExecutionContext<'a> {
    pub fn new(
        host: &'a mut dyn Host,
        account: Address,
        receipts: &'a dyn ReceiptTokenLookup,
    ) -> Self {
        Self {
            host,
            account,
            receipts,
        }
    }
}

/// What an adapter sees while running one hop.
pub struct HopEnv<'c, 'a> {
    ctx: &'c mut ExecutionContext<'a>,
    venues: &'c VenueBook,
}

impl<'c, 'a> HopEnv<'c, 'a> {
    pub fn new(ctx: &'c mut ExecutionContext<'a>, venues: &'c VenueBook) -> Self {
        Self { ctx, venues }
    }

    pub fn account(&self) -> Address {
        self.ctx.account
    }

    pub fn venues(&self) -> &VenueBook {
        self.venues
    }

    pub fn registered_receipt(&self, pool: Address) -> Option<Address> {
        self.ctx.receipts.receipt_token(pool)
    }

    /// Read-only call decoded into the function's return type.
    pub fn view<C: SolCall>(&mut self, target: Address, call: C) -> Result<C::Return, ZapError> {
        let raw = self.ctx.host.static_call(target, &call.abi_encode())?;
        C::abi_decode_returns(&raw).map_err(|e| ZapError::ExternalCall {
            target,
            reason: format!("malformed {} return data: {e}", C::SIGNATURE),
        })
    }

    pub fn invoke<C: SolCall>(
        &mut self,
        target: Address,
        value: U256,
        call: C,
    ) -> Result<(), ZapError> {
        tracing::trace!(
            target: "executor",
            %target,
            %value,
            function = C::SIGNATURE,
            "Pool call"
        );
        self.ctx
            .host
            .call(self.ctx.account, target, value, &call.abi_encode())?;
        Ok(())
    }

    pub fn balance(&self, token: Address) -> U256 {
        self.ctx.host.balance_of(token, self.ctx.account)
    }

    pub fn balance_of(&self, token: Address, holder: Address) -> U256 {
        self.ctx.host.balance_of(token, holder)
    }

    pub fn transfer(&mut self, token: Address, to: Address, amount: U256) -> Result<(), ZapError> {
        self.ctx
            .host
            .transfer(token, self.ctx.account, to, amount)?;
        Ok(())
    }

    /// Makes `amount` of `token` spendable by `spender`. Returns the native value the
    /// following call must attach, which is zero for ERC-20 inputs.
    pub fn fund(&mut self, token: Address, spender: Address, amount: U256) -> Result<U256, ZapError> {
        if is_native(token) {
            return Ok(amount);
        }
        self.ctx
            .host
            .approve(token, self.ctx.account, spender, amount)?;
        Ok(U256::ZERO)
    }

    /// Runs `op` and reports how much `token` the account gained.
    pub fn measure<F>(&mut self, token: Address, op: F) -> Result<U256, ZapError>
    where
        F: FnOnce(&mut Self) -> Result<(), ZapError>,
    {
        let before = self.balance(token);
        op(self)?;
        Ok(self.balance(token).saturating_sub(before))
    }
}

/// Closed dispatch table over every pool family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PoolAdapter {
    UniswapV2,
    UniswapV3,
    BalancerV2,
    Curve(CurveFamily),
    LidoStake,
    LidoWrap,
}

impl PoolAdapter {
    pub const fn for_pool_type(pool_type: PoolType) -> Self {
        match pool_type {
            PoolType::UniswapV2 => PoolAdapter::UniswapV2,
            PoolType::UniswapV3 => PoolAdapter::UniswapV3,
            PoolType::BalancerV2 => PoolAdapter::BalancerV2,
            PoolType::CurveETHPool => PoolAdapter::Curve(CurveFamily::Eth),
            PoolType::CurveCryptoPool => PoolAdapter::Curve(CurveFamily::Crypto),
            PoolType::CurveMetaCryptoPool => PoolAdapter::Curve(CurveFamily::MetaCrypto),
            PoolType::CurveTriCryptoPool => PoolAdapter::Curve(CurveFamily::TriCrypto),
            PoolType::CurveBasePool => PoolAdapter::Curve(CurveFamily::Base),
            PoolType::CurveAPool => PoolAdapter::Curve(CurveFamily::Lending),
            PoolType::CurveAPoolUnderlying => PoolAdapter::Curve(CurveFamily::LendingUnderlying),
            PoolType::CurveYPool => PoolAdapter::Curve(CurveFamily::Y),
            PoolType::CurveYPoolUnderlying => PoolAdapter::Curve(CurveFamily::YUnderlying),
            PoolType::CurveMetaPool => PoolAdapter::Curve(CurveFamily::Meta),
            PoolType::CurveMetaPoolUnderlying => PoolAdapter::Curve(CurveFamily::MetaUnderlying),
            PoolType::CurveFactoryPlainPool => PoolAdapter::Curve(CurveFamily::FactoryPlain),
            PoolType::CurveFactoryMetaPool => PoolAdapter::Curve(CurveFamily::FactoryMeta),
            PoolType::CurveFactoryUSDMetaPoolUnderlying => {
                PoolAdapter::Curve(CurveFamily::FactoryUsdMetaUnderlying)
            }
            PoolType::CurveFactoryBTCMetaPoolUnderlying => {
                PoolAdapter::Curve(CurveFamily::FactoryBtcMetaUnderlying)
            }
            PoolType::LidoStake => PoolAdapter::LidoStake,
            PoolType::LidoWrap => PoolAdapter::LidoWrap,
        }
    }

    pub fn execute(
        &self,
        env: &mut HopEnv<'_, '_>,
        hop: &Hop,
        amount_in: U256,
    ) -> Result<U256, ZapError> {
        if Self::for_pool_type(hop.pool_type) != *self {
            return Err(ZapError::config(format!(
                "{} hop dispatched to the {self:?} adapter",
                hop.pool_type
            )));
        }
        hop.validate()?;
        match self {
            PoolAdapter::UniswapV2 => uniswap::swap_v2(env, hop, amount_in),
            PoolAdapter::UniswapV3 => uniswap::swap_v3(env, hop, amount_in),
            PoolAdapter::BalancerV2 => balancer::execute(env, hop, amount_in),
            PoolAdapter::Curve(family) => curve::execute(*family, env, hop, amount_in),
            PoolAdapter::LidoStake => lido::stake(env, hop, amount_in),
            PoolAdapter::LidoWrap => lido::wrap_or_unwrap(env, hop, amount_in),
        }
    }
}

/// Pool token at a descriptor index.
pub(crate) fn token_at(tokens: &[Address], index: u8, pool: Address) -> Result<Address, ZapError> {
    tokens.get(usize::from(index)).copied().ok_or_else(|| {
        ZapError::config(format!(
            "index {index} out of range for the {} tokens of pool {pool}",
            tokens.len()
        ))
    })
}

/// Receipt token for `pool`: the registry wins, then the family's own answer.
pub(crate) fn receipt_token_or<F>(
    env: &mut HopEnv<'_, '_>,
    pool: Address,
    fallback: F,
) -> Result<Address, ZapError>
where
    F: FnOnce(&mut HopEnv<'_, '_>) -> Result<Option<Address>, ZapError>,
{
    if let Some(token) = env.registered_receipt(pool) {
        return Ok(token);
    }
    fallback(env)?.ok_or_else(|| {
        ZapError::config(format!("no receipt token registered for pool {pool}"))
    })
}


#[cfg(test)]
mod tests {
    use super::testing::RecordingHost;
    use super::*;
    use crate::services::zap::descriptor::Action;
    use alloy::primitives::address;

    #[test]
    fn every_pool_type_maps_to_an_adapter() {
        let curve = PoolType::ALL
            .iter()
            .filter(|t| matches!(PoolAdapter::for_pool_type(**t), PoolAdapter::Curve(_)))
            .count();
        assert_eq!(curve, 15);
        assert_eq!(
            PoolAdapter::for_pool_type(PoolType::CurveAPoolUnderlying),
            PoolAdapter::Curve(CurveFamily::LendingUnderlying)
        );
    }

    #[test]
    fn adapters_refuse_unsupported_actions_without_calling_out() {
        let mut host = RecordingHost::default();
        let receipts: HashMap<Address, Address> = HashMap::new();
        let venues = VenueBook::mainnet();
        let mut ctx = ExecutionContext::new(&mut host, Address::repeat_byte(0x11), &receipts);
        let mut env = HopEnv::new(&mut ctx, &venues);

        let hop = Hop {
            pool: address!("00000000000000000000000000000000000000a1"),
            pool_type: PoolType::UniswapV2,
            token_count: 2,
            index_in: 0,
            index_out: 1,
            action: Action::AddLiquidity,
            metadata: U256::ZERO,
        };
        let err = PoolAdapter::UniswapV2
            .execute(&mut env, &hop, U256::from(1u64))
            .unwrap_err();
        assert!(err.is_configuration());
        drop(env);
        drop(ctx);
        assert!(host.calls.is_empty());
    }

    #[test]
    fn hand_built_hops_are_validated_before_dispatch() {
        let mut host = RecordingHost::default();
        let receipts: HashMap<Address, Address> = HashMap::new();
        let venues = VenueBook::mainnet();
        let mut ctx = ExecutionContext::new(&mut host, Address::repeat_byte(0x11), &receipts);
        let mut env = HopEnv::new(&mut ctx, &venues);

        let mut hop = Hop {
            pool: address!("00000000000000000000000000000000000000a1"),
            pool_type: PoolType::UniswapV2,
            token_count: 2,
            index_in: 3,
            index_out: 0,
            action: Action::Swap,
            metadata: U256::ZERO,
        };
        let err = PoolAdapter::UniswapV2
            .execute(&mut env, &hop, U256::from(1u64))
            .unwrap_err();
        assert!(err.is_configuration());

        hop.pool_type = PoolType::CurveBasePool;
        hop.token_count = 4;
        let err = PoolAdapter::UniswapV2
            .execute(&mut env, &hop, U256::from(1u64))
            .unwrap_err();
        assert!(err.is_configuration());

        hop.pool_type = PoolType::BalancerV2;
        hop.token_count = 2;
        let err = PoolAdapter::BalancerV2
            .execute(&mut env, &hop, U256::from(1u64))
            .unwrap_err();
        assert!(err.is_configuration());
        drop(env);
        drop(ctx);
        assert!(host.calls.is_empty());
    }

    #[test]
    fn token_and_slot_lookups_are_checked() {
        let pool = address!("00000000000000000000000000000000000000a1");
        let tokens = [Address::repeat_byte(1), Address::repeat_byte(2)];
        assert_eq!(token_at(&tokens, 1, pool).unwrap(), tokens[1]);
        assert!(token_at(&tokens, 2, pool).unwrap_err().is_configuration());
    }

    #[test]
    fn registry_entry_wins_over_family_default() {
        let pool = address!("00000000000000000000000000000000000000a1");
        let lp = address!("00000000000000000000000000000000000000b2");
        let mut host = RecordingHost::default();
        let receipts = HashMap::from([(pool, lp)]);
        let venues = VenueBook::mainnet();
        let mut ctx = ExecutionContext::new(&mut host, Address::repeat_byte(0x11), &receipts);
        let mut env = HopEnv::new(&mut ctx, &venues);

        let resolved = receipt_token_or(&mut env, pool, |_| Ok(Some(pool))).unwrap();
        assert_eq!(resolved, lp);

        let other = address!("00000000000000000000000000000000000000a2");
        let err = receipt_token_or(&mut env, other, |_| Ok(None)).unwrap_err();
        assert!(err.is_configuration());
    }
}
