// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@mitander.dev>

use crate::common::constants::{UNISWAP_V2_DEFAULT_FEE_NUMERATOR, UNISWAP_V2_FEE_DENOMINATOR};
use crate::common::parsing::parse_u256;
use crate::domain::error::AppError;
use crate::services::zap::{RouteDescriptor, VenueBook};
use alloy::primitives::{Address, U256};
use config::{Config, Environment, File};
use serde::{Deserialize, Deserializer};
use std::path::Path;

#[derive(Debug, Deserialize, Clone)]
pub struct ZapSettings {
    // General
    #[serde(default = "default_debug")]
    pub debug: bool,
    #[serde(default = "default_false")]
    pub log_json: bool,

    // Identity
    pub zap_address: Address,
    pub owner: Address,
    /// Account replayed zaps are sent from; defaults to the owner.
    pub caller: Option<Address>,

    // Engine
    #[serde(default)]
    pub venues: VenueBook,
    #[serde(default)]
    pub routes: Vec<RouteConfig>,
    #[serde(default)]
    pub pool_tokens: Vec<PoolTokenConfig>,

    /// Offline world for `replay`.
    pub fixture: Option<FixtureConfig>,
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct RouteConfig {
    pub src: Address,
    pub dst: Address,
    pub hops: Vec<RouteDescriptor>,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct PoolTokenConfig {
    pub pool: Address,
    pub token: Address,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct FixtureConfig {
    #[serde(default)]
    pub balances: Vec<BalanceConfig>,
    #[serde(default)]
    pub pools: Vec<PoolFixture>,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct BalanceConfig {
    pub token: Address,
    pub holder: Address,
    #[serde(deserialize_with = "deserialize_amount")]
    pub amount: U256,
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PoolFixture {
    UniswapV2 {
        address: Address,
        token0: Address,
        token1: Address,
        #[serde(deserialize_with = "deserialize_amount")]
        reserve0: U256,
        #[serde(deserialize_with = "deserialize_amount")]
        reserve1: U256,
        /// Fee numerator per 1e6; 997000 (0.3%) when absent.
        #[serde(default = "default_v2_fee_numerator")]
        fee_numerator: u64,
    },
    Stableswap {
        address: Address,
        coins: Vec<Address>,
        #[serde(deserialize_with = "deserialize_amount_list")]
        balances: Vec<U256>,
        /// LP token address; the pool itself when absent.
        lp_token: Option<Address>,
        #[serde(default = "default_true")]
        signed_indices: bool,
        #[serde(default = "default_stableswap_fee_bps")]
        fee_bps: u64,
    },
    Lido {
        steth: Address,
        wsteth: Address,
        #[serde(deserialize_with = "deserialize_amount")]
        steth_per_token: U256,
        #[serde(default, deserialize_with = "deserialize_amount")]
        steth_reserve: U256,
    },
}

fn default_debug() -> bool {
    false
}

fn default_false() -> bool {
    false
}

fn default_true() -> bool {
    true
}

fn default_v2_fee_numerator() -> u64 {
    UNISWAP_V2_DEFAULT_FEE_NUMERATOR
}

fn default_stableswap_fee_bps() -> u64 {
    4
}

/// Amounts may be decimal or `0x` hex strings (values past `i64` do not fit in TOML
/// integers) or plain integers.
fn deserialize_amount<'de, D>(deserializer: D) -> Result<U256, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::{Error, Visitor};
    use std::fmt;

    struct AmountVisitor;

    impl Visitor<'_> for AmountVisitor {
        type Value = U256;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a non-negative integer or a decimal/hex string")
        }

        fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
        where
            E: Error,
        {
            parse_u256(v).ok_or_else(|| E::custom(format!("invalid amount '{v}'")))
        }

        fn visit_u64<E>(self, v: u64) -> Result<Self::Value, E>
        where
            E: Error,
        {
            Ok(U256::from(v))
        }

        fn visit_i64<E>(self, v: i64) -> Result<Self::Value, E>
        where
            E: Error,
        {
            u64::try_from(v)
                .map(U256::from)
                .map_err(|_| E::custom(format!("negative amount {v}")))
        }
    }

    deserializer.deserialize_any(AmountVisitor)
}

fn deserialize_amount_list<'de, D>(deserializer: D) -> Result<Vec<U256>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawAmount {
        Int(u64),
        Text(String),
    }

    Vec::<RawAmount>::deserialize(deserializer)?
        .into_iter()
        .map(|raw| match raw {
            RawAmount::Int(v) => Ok(U256::from(v)),
            RawAmount::Text(v) => {
                parse_u256(&v).ok_or_else(|| D::Error::custom(format!("invalid amount '{v}'")))
            }
        })
        .collect()
}

impl ZapSettings {
    pub fn load_with_path(path: Option<&str>) -> Result<Self, AppError> {
        // Load .env file if it exists
        dotenvy::dotenv().ok();

        let mut builder = Config::builder();
        if let Some(selected_path) = path {
            builder = builder.add_source(File::from(Path::new(selected_path)).required(true));
        } else {
            builder = builder.add_source(File::with_name("config").required(false));
        }
        // Precedence: env/.env over the selected file.
        builder = builder.add_source(Environment::default());

        let settings: ZapSettings = builder.build()?.try_deserialize()?;
        settings.validate()?;
        tracing::debug!(
            target: "config",
            zap = %settings.zap_address,
            owner = %settings.owner,
            routes = settings.routes.len(),
            pool_tokens = settings.pool_tokens.len(),
            fixture = settings.fixture.is_some(),
            "Settings loaded"
        );
        Ok(settings)
    }

    pub fn load() -> Result<Self, AppError> {
        Self::load_with_path(None)
    }

    pub fn caller_or_owner(&self) -> Address {
        self.caller.unwrap_or(self.owner)
    }

    pub fn validate(&self) -> Result<(), AppError> {
        if self.zap_address == Address::ZERO {
            return Err(validation("zap_address", "must not be the zero address"));
        }
        if self.owner == Address::ZERO {
            return Err(validation("owner", "must not be the zero address"));
        }
        for (i, route) in self.routes.iter().enumerate() {
            if route.hops.is_empty() {
                return Err(validation(
                    &format!("routes[{i}].hops"),
                    "a configured route needs at least one hop",
                ));
            }
            for (j, hop) in route.hops.iter().enumerate() {
                hop.resolve()
                    .map_err(|e| validation(&format!("routes[{i}].hops[{j}]"), &e.to_string()))?;
            }
        }
        if let Some(fixture) = &self.fixture {
            for (i, pool) in fixture.pools.iter().enumerate() {
                if let PoolFixture::UniswapV2 { fee_numerator, .. } = pool
                    && *fee_numerator > UNISWAP_V2_FEE_DENOMINATOR
                {
                    return Err(validation(
                        &format!("fixture.pools[{i}].fee_numerator"),
                        &format!("must be at most {UNISWAP_V2_FEE_DENOMINATOR}"),
                    ));
                }
                if let PoolFixture::Stableswap {
                    coins, balances, ..
                } = pool
                    && coins.len() != balances.len()
                {
                    return Err(validation(
                        &format!("fixture.pools[{i}]"),
                        &format!("{} coins but {} balances", coins.len(), balances.len()),
                    ));
                }
            }
        }
        Ok(())
    }
}

fn validation(field: &str, message: &str) -> AppError {
    AppError::Validation {
        field: field.to_string(),
        message: message.to_string(),
    }
}
