// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@on1.no>

//! Call surfaces of every pool family the adapters speak to.
//!
//! Curve interfaces are split by index signedness and by array arity because the
//! same function name exists with several incompatible signatures across pool
//! generations; keeping them in separate interfaces keeps the generated call types
//! unambiguous.

use alloy::sol;

sol! {
    #[derive(Debug, PartialEq, Eq)]
    interface IUniswapV2Pair {
        function token0() external view returns (address);
        function token1() external view returns (address);
        function getReserves() external view returns (uint112 reserve0, uint112 reserve1, uint32 blockTimestampLast);
        function swap(uint256 amount0Out, uint256 amount1Out, address to, bytes calldata data) external;
    }

    #[derive(Debug, PartialEq, Eq)]
    interface IUniswapV3Pool {
        function token0() external view returns (address);
        function token1() external view returns (address);
        function fee() external view returns (uint24);
    }

    #[derive(Debug, PartialEq, Eq)]
    interface IUniswapV3Router {
        struct ExactInputSingleParams {
            address tokenIn;
            address tokenOut;
            uint24 fee;
            address recipient;
            uint256 deadline;
            uint256 amountIn;
            uint256 amountOutMinimum;
            uint160 sqrtPriceLimitX96;
        }
        function exactInputSingle(ExactInputSingleParams calldata params) external payable returns (uint256 amountOut);
    }

    #[derive(Debug, PartialEq, Eq)]
    interface IBalancerPool {
        function getPoolId() external view returns (bytes32);
    }

    #[derive(Debug, PartialEq, Eq)]
    interface IBalancerVault {
        struct BatchSwapStep {
            bytes32 poolId;
            uint256 assetInIndex;
            uint256 assetOutIndex;
            uint256 amount;
            bytes userData;
        }
        struct FundManagement {
            address sender;
            bool fromInternalBalance;
            address recipient;
            bool toInternalBalance;
        }
        struct JoinPoolRequest {
            address[] assets;
            uint256[] maxAmountsIn;
            bytes userData;
            bool fromInternalBalance;
        }
        struct ExitPoolRequest {
            address[] assets;
            uint256[] minAmountsOut;
            bytes userData;
            bool toInternalBalance;
        }
        function getPoolTokens(bytes32 poolId) external view returns (address[] tokens, uint256[] balances, uint256 lastChangeBlock);
        function batchSwap(uint8 kind, BatchSwapStep[] swaps, address[] assets, FundManagement funds, int256[] limits, uint256 deadline) external payable returns (int256[] assetDeltas);
        function joinPool(bytes32 poolId, address sender, address recipient, JoinPoolRequest request) external payable;
        function exitPool(bytes32 poolId, address sender, address recipient, ExitPoolRequest request) external;
    }

    /// View surface shared by modern Curve pools and deposit zaps.
    #[derive(Debug, PartialEq, Eq)]
    interface ICurveViews {
        function coins(uint256 i) external view returns (address);
        function underlying_coins(uint256 i) external view returns (address);
        function base_coins(uint256 i) external view returns (address);
        function token() external view returns (address);
        function curve() external view returns (address);
        function pool() external view returns (address);
    }

    /// View surface of the first-generation (y/compound era) pools.
    #[derive(Debug, PartialEq, Eq)]
    interface ICurveLegacyViews {
        function coins(int128 i) external view returns (address);
        function underlying_coins(int128 i) external view returns (address);
    }

    #[derive(Debug, PartialEq, Eq)]
    interface ICurveInt128Pool {
        function exchange(int128 i, int128 j, uint256 dx, uint256 min_dy) external payable;
        function exchange_underlying(int128 i, int128 j, uint256 dx, uint256 min_dy) external payable;
        function remove_liquidity_one_coin(uint256 token_amount, int128 i, uint256 min_amount) external;
    }

    #[derive(Debug, PartialEq, Eq)]
    interface ICurveUint256Pool {
        function exchange(uint256 i, uint256 j, uint256 dx, uint256 min_dy) external payable;
        function exchange_underlying(uint256 i, uint256 j, uint256 dx, uint256 min_dy) external payable;
        function remove_liquidity_one_coin(uint256 token_amount, uint256 i, uint256 min_amount) external;
    }

    #[derive(Debug, PartialEq, Eq)]
    interface ICurveTriCryptoPool {
        function exchange(uint256 i, uint256 j, uint256 dx, uint256 min_dy, bool use_eth) external payable;
    }

    /// Lending pools (`use_underlying`) and y-deposit zaps (`donate_dust`) share this shape.
    #[derive(Debug, PartialEq, Eq)]
    interface ICurveFlaggedRemove {
        function remove_liquidity_one_coin(uint256 token_amount, int128 i, uint256 min_amount, bool flag) external;
    }

    #[derive(Debug, PartialEq, Eq)]
    interface ICurvePool2 {
        function add_liquidity(uint256[2] amounts, uint256 min_mint_amount) external payable;
    }

    #[derive(Debug, PartialEq, Eq)]
    interface ICurvePool3 {
        function add_liquidity(uint256[3] amounts, uint256 min_mint_amount) external payable;
    }

    #[derive(Debug, PartialEq, Eq)]
    interface ICurvePool4 {
        function add_liquidity(uint256[4] amounts, uint256 min_mint_amount) external payable;
    }

    #[derive(Debug, PartialEq, Eq)]
    interface ICurveLendingPool2 {
        function add_liquidity(uint256[2] amounts, uint256 min_mint_amount, bool use_underlying) external;
    }

    #[derive(Debug, PartialEq, Eq)]
    interface ICurveLendingPool3 {
        function add_liquidity(uint256[3] amounts, uint256 min_mint_amount, bool use_underlying) external;
    }

    #[derive(Debug, PartialEq, Eq)]
    interface ICurveLendingPool4 {
        function add_liquidity(uint256[4] amounts, uint256 min_mint_amount, bool use_underlying) external;
    }

    /// Factory metapool deposit zap; the target pool is an explicit argument.
    #[derive(Debug, PartialEq, Eq)]
    interface ICurveFactoryMetaZap {
        function add_liquidity(address pool, uint256[4] deposit_amounts, uint256 min_mint_amount) external;
        function remove_liquidity_one_coin(address pool, uint256 burn_amount, int128 i, uint256 min_amount) external;
    }

    #[derive(Debug, PartialEq, Eq)]
    interface ILidoStETH {
        function submit(address referral) external payable returns (uint256);
    }

    #[derive(Debug, PartialEq, Eq)]
    interface IWstETH {
        function stETH() external view returns (address);
        function wrap(uint256 stETHAmount) external returns (uint256);
        function unwrap(uint256 wstETHAmount) external returns (uint256);
    }
}
