// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@oxidity.com>

use crate::common::constants::{
    BALANCER_EXIT_EXACT_BPT_IN_FOR_ONE_TOKEN_OUT, BALANCER_JOIN_EXACT_TOKENS_IN,
    BALANCER_SWAP_KIND_GIVEN_IN,
};
use crate::common::error::ZapError;
use crate::infrastructure::data::abi::{IBalancerPool, IBalancerVault};
use crate::services::zap::adapters::{HopEnv, receipt_token_or, token_at};
use crate::services::zap::descriptor::{Action, Hop};
use alloy::primitives::{Address, B256, Bytes, I256, U256};
use alloy_sol_types::SolValue;

/// Balancer pools are their own BPT.
pub fn receipt_token(env: &mut HopEnv<'_, '_>, pool: Address) -> Result<Address, ZapError> {
    receipt_token_or(env, pool, |_| Ok(Some(pool)))
}

fn pool_tokens(
    env: &mut HopEnv<'_, '_>,
    vault: Address,
    hop: &Hop,
) -> Result<(B256, Vec<Address>), ZapError> {
    let pool_id = env.view(hop.pool, IBalancerPool::getPoolIdCall {})?;
    let tokens = env
        .view(vault, IBalancerVault::getPoolTokensCall { poolId: pool_id })?
        .tokens;
    if tokens.len() != usize::from(hop.token_count) {
        return Err(ZapError::config(format!(
            "balancer pool {} holds {} tokens, descriptor says {}",
            hop.pool,
            tokens.len(),
            hop.token_count
        )));
    }
    Ok((pool_id, tokens))
}

fn funds(account: Address) -> IBalancerVault::FundManagement {
    IBalancerVault::FundManagement {
        sender: account,
        fromInternalBalance: false,
        recipient: account,
        toInternalBalance: false,
    }
}

pub fn execute(env: &mut HopEnv<'_, '_>, hop: &Hop, amount_in: U256) -> Result<U256, ZapError> {
    let vault = env.venues().balancer_vault;
    let (pool_id, tokens) = pool_tokens(env, vault, hop)?;
    let account = env.account();

    match hop.action {
        Action::Swap => {
            let token_in = token_at(&tokens, hop.index_in, hop.pool)?;
            let token_out = token_at(&tokens, hop.index_out, hop.pool)?;
            let limit_in = I256::try_from(amount_in)
                .map_err(|_| ZapError::config(format!("amount {amount_in} exceeds int256")))?;
            env.measure(token_out, |env| {
                let value = env.fund(token_in, vault, amount_in)?;
                env.invoke(
                    vault,
                    value,
                    IBalancerVault::batchSwapCall {
                        kind: BALANCER_SWAP_KIND_GIVEN_IN,
                        swaps: vec![IBalancerVault::BatchSwapStep {
                            poolId: pool_id,
                            assetInIndex: U256::ZERO,
                            assetOutIndex: U256::from(1u64),
                            amount: amount_in,
                            userData: Bytes::new(),
                        }],
                        assets: vec![token_in, token_out],
                        funds: funds(account),
                        limits: vec![limit_in, I256::ZERO],
                        deadline: U256::MAX,
                    },
                )
            })
        }
        Action::AddLiquidity => {
            let token_in = token_at(&tokens, hop.index_in, hop.pool)?;
            let bpt = receipt_token(env, hop.pool)?;
            let amounts: Vec<U256> = (0..tokens.len())
                .map(|i| if i == usize::from(hop.index_in) { amount_in } else { U256::ZERO })
                .collect();
            let user_data = (
                U256::from(BALANCER_JOIN_EXACT_TOKENS_IN),
                amounts.clone(),
                U256::ZERO,
            )
                .abi_encode_params();
            env.measure(bpt, |env| {
                let value = env.fund(token_in, vault, amount_in)?;
                env.invoke(
                    vault,
                    value,
                    IBalancerVault::joinPoolCall {
                        poolId: pool_id,
                        sender: account,
                        recipient: account,
                        request: IBalancerVault::JoinPoolRequest {
                            assets: tokens,
                            maxAmountsIn: amounts,
                            userData: user_data.into(),
                            fromInternalBalance: false,
                        },
                    },
                )
            })
        }
        Action::RemoveLiquidity => {
            let token_out = token_at(&tokens, hop.index_out, hop.pool)?;
            let user_data = (
                U256::from(BALANCER_EXIT_EXACT_BPT_IN_FOR_ONE_TOKEN_OUT),
                amount_in,
                U256::from(hop.index_out),
            )
                .abi_encode_params();
            let min_amounts_out = vec![U256::ZERO; tokens.len()];
            env.measure(token_out, |env| {
                env.invoke(
                    vault,
                    U256::ZERO,
                    IBalancerVault::exitPoolCall {
                        poolId: pool_id,
                        sender: account,
                        recipient: account,
                        request: IBalancerVault::ExitPoolRequest {
                            assets: tokens,
                            minAmountsOut: min_amounts_out,
                            userData: user_data.into(),
                            toInternalBalance: false,
                        },
                    },
                )
            })
        }
    }
}
