// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@oxidity.com>

use crate::common::constants;
use alloy::primitives::Address;
use serde::Deserialize;

/// Shared venue contracts that descriptors reference implicitly. Descriptors only
/// carry a pool address; routers, vaults and deposit zaps come from here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct VenueBook {
    pub uniswap_v3_router: Address,
    pub balancer_vault: Address,
    pub curve_usd_meta_zap: Address,
    pub curve_btc_meta_zap: Address,
    /// Base pool behind USD factory metapools (3pool); supplies underlying coins 1..=3.
    pub curve_usd_base_pool: Address,
    /// Base pool behind BTC factory metapools (sbtc).
    pub curve_btc_base_pool: Address,
}

impl Default for VenueBook {
    fn default() -> Self {
        Self::mainnet()
    }
}

impl VenueBook {
    pub const fn mainnet() -> Self {
        Self {
            uniswap_v3_router: constants::UNISWAP_V3_ROUTER,
            balancer_vault: constants::BALANCER_V2_VAULT,
            curve_usd_meta_zap: constants::CURVE_USD_META_ZAP,
            curve_btc_meta_zap: constants::CURVE_BTC_META_ZAP,
            curve_usd_base_pool: constants::CURVE_3POOL,
            curve_btc_base_pool: constants::CURVE_SBTC_POOL,
        }
    }
}
