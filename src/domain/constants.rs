// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@oxidity.com>

use alloy::primitives::{Address, address};

// =============================================================================
// ASSETS
// =============================================================================

/// Sentinel standing in for the chain's native asset wherever a token address is expected.
pub const NATIVE_ASSET: Address = address!("EeeeeEeeeEeEeeEeEeEeeEEEeeeeEeeeeeeeEEeE");

pub fn is_native(token: Address) -> bool {
    token == NATIVE_ASSET
}

// =============================================================================
// SHARED VENUE CONTRACTS (Mainnet)
// =============================================================================

pub const UNISWAP_V3_ROUTER: Address = address!("E592427A0AEce92De3Edee1F18E0157C05861564");
pub const BALANCER_V2_VAULT: Address = address!("BA12222222228d8Ba445958a75a0704d566BF2C8");
/// Deposit zap shared by every factory metapool paired against 3pool.
pub const CURVE_USD_META_ZAP: Address = address!("A79828DF1850E8a3A3064576f380D90aECDD3359");
/// Deposit zap shared by every factory metapool paired against sbtc.
pub const CURVE_BTC_META_ZAP: Address = address!("7AbDBAf29929e7F8621B757D2a7c04d78d633834");
pub const CURVE_3POOL: Address = address!("bEbc44782C7dB0a1A60Cb6fe97d0b483032FF1C7");
pub const CURVE_SBTC_POOL: Address = address!("7fC77b5c7614E1533320Ea6DDc2Eb61fa00A9714");

// =============================================================================
// DESCRIPTOR / ADAPTER CONSTANTS
// =============================================================================

/// Denominator for the UniswapV2 fee numerator carried in descriptor metadata.
pub const UNISWAP_V2_FEE_DENOMINATOR: u64 = 1_000_000;
/// 0.3% fee, used when a UniswapV2 descriptor leaves its fee bits at zero.
pub const UNISWAP_V2_DEFAULT_FEE_NUMERATOR: u64 = 997_000;

/// Balancer `SwapKind.GIVEN_IN`.
pub const BALANCER_SWAP_KIND_GIVEN_IN: u8 = 0;
/// Balancer weighted-pool `JoinKind.EXACT_TOKENS_IN_FOR_BPT_OUT`.
pub const BALANCER_JOIN_EXACT_TOKENS_IN: u64 = 1;
/// Balancer weighted-pool `ExitKind.EXACT_BPT_IN_FOR_ONE_TOKEN_OUT`.
pub const BALANCER_EXIT_EXACT_BPT_IN_FOR_ONE_TOKEN_OUT: u64 = 0;
