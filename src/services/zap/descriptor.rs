// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@oxidity.com>

//! Packed 256-bit route descriptors.
//!
//! | bits    | field                      |
//! |---------|----------------------------|
//! | 0-159   | pool address               |
//! | 160-167 | pool-type tag              |
//! | 168-169 | token count - 1            |
//! | 170-171 | input index                |
//! | 172-173 | output index               |
//! | 174-175 | action                     |
//! | 176-255 | per-type metadata          |
//!
//! Decoding is total: any word yields raw fields. Turning those into an executable
//! [`Hop`] is a separate, fallible step.

use crate::common::error::ZapError;
use crate::common::parsing::parse_u256;
use alloy::primitives::{Address, U256};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

const TYPE_SHIFT: usize = 160;
const TOKEN_COUNT_SHIFT: usize = 168;
const INDEX_IN_SHIFT: usize = 170;
const INDEX_OUT_SHIFT: usize = 172;
const ACTION_SHIFT: usize = 174;
pub const METADATA_SHIFT: usize = 176;
pub const METADATA_BITS: usize = 256 - METADATA_SHIFT;
pub const MAX_TOKEN_COUNT: u8 = 4;

const BYTE_MASK: u64 = 0xff;
const TWO_BIT_MASK: u64 = 0b11;

/// AMM families the executor can drive. The discriminant is the on-wire tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum PoolType {
    UniswapV2 = 0,
    UniswapV3 = 1,
    BalancerV2 = 2,
    CurveETHPool = 3,
    CurveCryptoPool = 4,
    CurveMetaCryptoPool = 5,
    CurveTriCryptoPool = 6,
    CurveBasePool = 7,
    CurveAPool = 8,
    CurveAPoolUnderlying = 9,
    CurveYPool = 10,
    CurveYPoolUnderlying = 11,
    CurveMetaPool = 12,
    CurveMetaPoolUnderlying = 13,
    CurveFactoryPlainPool = 14,
    CurveFactoryMetaPool = 15,
    CurveFactoryUSDMetaPoolUnderlying = 16,
    CurveFactoryBTCMetaPoolUnderlying = 17,
    LidoStake = 18,
    LidoWrap = 19,
}

impl PoolType {
    pub const ALL: [PoolType; 20] = [
        PoolType::UniswapV2,
        PoolType::UniswapV3,
        PoolType::BalancerV2,
        PoolType::CurveETHPool,
        PoolType::CurveCryptoPool,
        PoolType::CurveMetaCryptoPool,
        PoolType::CurveTriCryptoPool,
        PoolType::CurveBasePool,
        PoolType::CurveAPool,
        PoolType::CurveAPoolUnderlying,
        PoolType::CurveYPool,
        PoolType::CurveYPoolUnderlying,
        PoolType::CurveMetaPool,
        PoolType::CurveMetaPoolUnderlying,
        PoolType::CurveFactoryPlainPool,
        PoolType::CurveFactoryMetaPool,
        PoolType::CurveFactoryUSDMetaPoolUnderlying,
        PoolType::CurveFactoryBTCMetaPoolUnderlying,
        PoolType::LidoStake,
        PoolType::LidoWrap,
    ];

    pub const fn tag(self) -> u8 {
        self as u8
    }

    pub fn from_tag(tag: u8) -> Result<Self, ZapError> {
        Self::ALL
            .get(usize::from(tag))
            .copied()
            .ok_or_else(|| ZapError::config(format!("unknown pool type tag {tag}")))
    }

    pub const fn name(self) -> &'static str {
        match self {
            PoolType::UniswapV2 => "uniswap-v2",
            PoolType::UniswapV3 => "uniswap-v3",
            PoolType::BalancerV2 => "balancer-v2",
            PoolType::CurveETHPool => "curve-eth",
            PoolType::CurveCryptoPool => "curve-crypto",
            PoolType::CurveMetaCryptoPool => "curve-meta-crypto",
            PoolType::CurveTriCryptoPool => "curve-tricrypto",
            PoolType::CurveBasePool => "curve-base",
            PoolType::CurveAPool => "curve-a",
            PoolType::CurveAPoolUnderlying => "curve-a-underlying",
            PoolType::CurveYPool => "curve-y",
            PoolType::CurveYPoolUnderlying => "curve-y-underlying",
            PoolType::CurveMetaPool => "curve-meta",
            PoolType::CurveMetaPoolUnderlying => "curve-meta-underlying",
            PoolType::CurveFactoryPlainPool => "curve-factory-plain",
            PoolType::CurveFactoryMetaPool => "curve-factory-meta",
            PoolType::CurveFactoryUSDMetaPoolUnderlying => "curve-factory-usd-meta-underlying",
            PoolType::CurveFactoryBTCMetaPoolUnderlying => "curve-factory-btc-meta-underlying",
            PoolType::LidoStake => "lido-stake",
            PoolType::LidoWrap => "lido-wrap",
        }
    }

    pub const fn supports(self, action: Action) -> bool {
        match self {
            PoolType::UniswapV2 | PoolType::UniswapV3 => matches!(action, Action::Swap),
            PoolType::CurveYPool => !matches!(action, Action::RemoveLiquidity),
            PoolType::LidoStake => matches!(action, Action::AddLiquidity),
            PoolType::LidoWrap => !matches!(action, Action::Swap),
            _ => true,
        }
    }

    /// Token counts a descriptor of this family may carry.
    pub const fn token_counts(self) -> RangeInclusive<u8> {
        match self {
            PoolType::LidoStake | PoolType::LidoWrap => 1..=1,
            PoolType::UniswapV2
            | PoolType::UniswapV3
            | PoolType::CurveETHPool
            | PoolType::CurveCryptoPool
            | PoolType::CurveMetaPool
            | PoolType::CurveFactoryMetaPool => 2..=2,
            PoolType::CurveTriCryptoPool => 3..=3,
            PoolType::CurveFactoryUSDMetaPoolUnderlying
            | PoolType::CurveFactoryBTCMetaPoolUnderlying => 4..=4,
            _ => 2..=MAX_TOKEN_COUNT,
        }
    }

    /// Wrapping families transform one asset into another and take no indices.
    pub const fn is_wrapper(self) -> bool {
        matches!(self, PoolType::LidoStake | PoolType::LidoWrap)
    }
}

impl fmt::Display for PoolType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PoolType {
    type Err = ZapError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('_', "-");
        if let Ok(tag) = normalized.parse::<u8>() {
            return Self::from_tag(tag);
        }
        Self::ALL
            .iter()
            .copied()
            .find(|t| t.name() == normalized)
            .ok_or_else(|| ZapError::config(format!("unknown pool type '{s}'")))
    }
}

impl Serialize for PoolType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl TryFrom<u8> for PoolType {
    type Error = ZapError;

    fn try_from(tag: u8) -> Result<Self, Self::Error> {
        Self::from_tag(tag)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Action {
    Swap = 0,
    AddLiquidity = 1,
    RemoveLiquidity = 2,
}

impl Action {
    pub const fn tag(self) -> u8 {
        self as u8
    }

    pub fn from_tag(tag: u8) -> Result<Self, ZapError> {
        match tag {
            0 => Ok(Action::Swap),
            1 => Ok(Action::AddLiquidity),
            2 => Ok(Action::RemoveLiquidity),
            other => Err(ZapError::config(format!("unknown action tag {other}"))),
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Action::Swap => "swap",
            Action::AddLiquidity => "add-liquidity",
            Action::RemoveLiquidity => "remove-liquidity",
        })
    }
}

impl Serialize for Action {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl FromStr for Action {
    type Err = ZapError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "swap" | "0" => Ok(Action::Swap),
            "add" | "add-liquidity" | "1" => Ok(Action::AddLiquidity),
            "remove" | "remove-liquidity" | "2" => Ok(Action::RemoveLiquidity),
            _ => Err(ZapError::config(format!("unknown action '{s}'"))),
        }
    }
}

/// Raw fields of a descriptor word; no validation applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DecodedDescriptor {
    pub pool: Address,
    pub pool_type: u8,
    pub token_count: u8,
    pub index_in: u8,
    pub index_out: u8,
    pub action: u8,
    pub metadata: U256,
}

/// A validated hop, ready for dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Hop {
    pub pool: Address,
    pub pool_type: PoolType,
    pub token_count: u8,
    pub index_in: u8,
    pub index_out: u8,
    pub action: Action,
    pub metadata: U256,
}

impl Hop {
    /// Re-checks the field constraints [`RouteDescriptor::resolve`] enforces, for hops
    /// assembled by hand.
    pub fn validate(&self) -> Result<(), ZapError> {
        validate(
            self.pool,
            self.pool_type,
            self.token_count,
            self.index_in,
            self.index_out,
            self.action,
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct RouteDescriptor(U256);

impl RouteDescriptor {
    pub const fn from_word(word: U256) -> Self {
        Self(word)
    }

    pub const fn word(self) -> U256 {
        self.0
    }

    pub fn encode(
        pool: Address,
        pool_type: PoolType,
        token_count: u8,
        index_in: u8,
        index_out: u8,
        action: Action,
        metadata: U256,
    ) -> Result<Self, ZapError> {
        validate(pool, pool_type, token_count, index_in, index_out, action)?;
        if metadata.bit_len() > METADATA_BITS {
            return Err(ZapError::config(format!(
                "metadata {metadata:#x} exceeds {METADATA_BITS} bits"
            )));
        }

        let word = U256::from_be_slice(pool.as_slice())
            | U256::from(pool_type.tag()) << TYPE_SHIFT
            | U256::from(token_count - 1) << TOKEN_COUNT_SHIFT
            | U256::from(index_in) << INDEX_IN_SHIFT
            | U256::from(index_out) << INDEX_OUT_SHIFT
            | U256::from(action.tag()) << ACTION_SHIFT
            | metadata << METADATA_SHIFT;
        Ok(Self(word))
    }

    pub fn decode(self) -> DecodedDescriptor {
        DecodedDescriptor {
            pool: self.pool(),
            pool_type: self.pool_type_tag(),
            token_count: self.token_count(),
            index_in: self.index_in(),
            index_out: self.index_out(),
            action: self.action_tag(),
            metadata: self.metadata(),
        }
    }

    /// Validates the raw fields and produces a typed hop.
    pub fn resolve(self) -> Result<Hop, ZapError> {
        let raw = self.decode();
        let pool_type = PoolType::from_tag(raw.pool_type)?;
        let action = Action::from_tag(raw.action)?;
        validate(
            raw.pool,
            pool_type,
            raw.token_count,
            raw.index_in,
            raw.index_out,
            action,
        )?;
        Ok(Hop {
            pool: raw.pool,
            pool_type,
            token_count: raw.token_count,
            index_in: raw.index_in,
            index_out: raw.index_out,
            action,
            metadata: raw.metadata,
        })
    }

    pub fn pool(self) -> Address {
        let bytes = self.0.to_be_bytes::<32>();
        Address::from_slice(&bytes[12..])
    }

    pub fn pool_type_tag(self) -> u8 {
        self.field(TYPE_SHIFT, BYTE_MASK)
    }

    /// Stored as `count - 1`, so the result is always in `1..=4`.
    pub fn token_count(self) -> u8 {
        self.field(TOKEN_COUNT_SHIFT, TWO_BIT_MASK) + 1
    }

    pub fn index_in(self) -> u8 {
        self.field(INDEX_IN_SHIFT, TWO_BIT_MASK)
    }

    pub fn index_out(self) -> u8 {
        self.field(INDEX_OUT_SHIFT, TWO_BIT_MASK)
    }

    pub fn action_tag(self) -> u8 {
        self.field(ACTION_SHIFT, TWO_BIT_MASK)
    }

    pub fn metadata(self) -> U256 {
        self.0 >> METADATA_SHIFT
    }

    fn field(self, shift: usize, mask: u64) -> u8 {
        ((self.0 >> shift) & U256::from(mask)).to::<u8>()
    }
}

fn validate(
    pool: Address,
    pool_type: PoolType,
    token_count: u8,
    index_in: u8,
    index_out: u8,
    action: Action,
) -> Result<(), ZapError> {
    if pool == Address::ZERO {
        return Err(ZapError::config("descriptor pool is the zero address"));
    }
    if !(1..=MAX_TOKEN_COUNT).contains(&token_count) {
        return Err(ZapError::config(format!(
            "token count {token_count} outside [1, {MAX_TOKEN_COUNT}]"
        )));
    }
    if index_in >= token_count || index_out >= token_count {
        return Err(ZapError::config(format!(
            "indices ({index_in}, {index_out}) out of range for {token_count} tokens"
        )));
    }
    if !pool_type.supports(action) {
        return Err(ZapError::config(format!(
            "{pool_type} pools do not support {action}"
        )));
    }
    if !pool_type.token_counts().contains(&token_count) {
        return Err(ZapError::config(format!(
            "{pool_type} pools take {:?} tokens, got {token_count}",
            pool_type.token_counts()
        )));
    }
    if action == Action::Swap && index_in == index_out {
        return Err(ZapError::config(format!(
            "swap on {pool} uses index {index_in} for both sides"
        )));
    }
    Ok(())
}

impl From<U256> for RouteDescriptor {
    fn from(word: U256) -> Self {
        Self(word)
    }
}

impl fmt::Display for RouteDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0.to_be_bytes::<32>()))
    }
}

impl FromStr for RouteDescriptor {
    type Err = ZapError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_u256(s)
            .map(Self)
            .ok_or_else(|| ZapError::config(format!("invalid descriptor word '{s}'")))
    }
}

/// Descriptors travel as 0x-prefixed 32-byte hex strings in config and events.
impl Serialize for RouteDescriptor {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for RouteDescriptor {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::address;

    const POOL: Address = address!("0d4a11d5EEaaC28EC3F61d100daF4d40471f1852");

    fn valid_shape(pool_type: PoolType) -> (u8, u8, u8, Action) {
        let count = *pool_type.token_counts().end();
        if pool_type.is_wrapper() {
            return (1, 0, 0, Action::AddLiquidity);
        }
        (count, count - 1, 0, Action::Swap)
    }

    #[test]
    fn round_trips_every_pool_type() {
        for pool_type in PoolType::ALL {
            let (count, index_in, index_out, action) = valid_shape(pool_type);
            let metadata = U256::from(0xabcdefu64) << 40usize;
            let descriptor = RouteDescriptor::encode(
                POOL, pool_type, count, index_in, index_out, action, metadata,
            )
            .unwrap();
            let decoded = descriptor.decode();
            assert_eq!(
                decoded,
                DecodedDescriptor {
                    pool: POOL,
                    pool_type: pool_type.tag(),
                    token_count: count,
                    index_in,
                    index_out,
                    action: action.tag(),
                    metadata,
                },
                "{pool_type}"
            );
            let hop = descriptor.resolve().unwrap();
            assert_eq!(hop.pool_type, pool_type);
            assert_eq!(hop.action, action);
        }
    }

    #[test]
    fn fields_land_on_documented_bits() {
        let descriptor = RouteDescriptor::encode(
            POOL,
            PoolType::CurveFactoryPlainPool,
            4,
            3,
            2,
            Action::RemoveLiquidity,
            U256::from(1u64),
        )
        .unwrap();
        let word = descriptor.word();
        let low = word & ((U256::from(1u64) << 160usize) - U256::from(1u64));
        assert_eq!(low, U256::from_be_slice(POOL.as_slice()));
        assert_eq!((word >> 160) & U256::from(0xffu64), U256::from(14u64));
        assert_eq!((word >> 168) & U256::from(3u64), U256::from(3u64));
        assert_eq!((word >> 170) & U256::from(3u64), U256::from(3u64));
        assert_eq!((word >> 172) & U256::from(3u64), U256::from(2u64));
        assert_eq!((word >> 174) & U256::from(3u64), U256::from(2u64));
        assert_eq!(word >> 176, U256::from(1u64));
    }

    #[test]
    fn single_bit_words_decode_to_single_fields() {
        let at = |bit: usize| RouteDescriptor::from_word(U256::from(1u64) << bit).decode();

        assert_eq!(at(159).pool, address!("8000000000000000000000000000000000000000"));
        assert_eq!(at(160).pool_type, 1);
        assert_eq!(at(167).pool_type, 0x80);
        assert_eq!(at(168).token_count, 2);
        assert_eq!(at(169).token_count, 3);
        assert_eq!(at(170).index_in, 1);
        assert_eq!(at(171).index_in, 2);
        assert_eq!(at(172).index_out, 1);
        assert_eq!(at(173).index_out, 2);
        assert_eq!(at(174).action, 1);
        assert_eq!(at(175).action, 2);
        assert_eq!(at(176).metadata, U256::from(1u64));
        assert_eq!(at(255).metadata, U256::from(1u64) << 79usize);

        let zero = RouteDescriptor::default().decode();
        assert_eq!(zero.token_count, 1);
        assert_eq!(zero.pool, Address::ZERO);
    }

    #[test]
    fn decode_is_total_for_arbitrary_words() {
        let decoded = RouteDescriptor::from_word(U256::MAX).decode();
        assert_eq!(decoded.pool_type, 0xff);
        assert_eq!(decoded.token_count, 4);
        assert_eq!(decoded.index_in, 3);
        assert_eq!(decoded.index_out, 3);
        assert_eq!(decoded.action, 3);
        assert_eq!(decoded.metadata, (U256::from(1u64) << 80usize) - U256::from(1u64));
    }

    #[test]
    fn encode_rejects_out_of_bounds_shapes() {
        let encode = |count, index_in, index_out| {
            RouteDescriptor::encode(
                POOL,
                PoolType::CurveBasePool,
                count,
                index_in,
                index_out,
                Action::Swap,
                U256::ZERO,
            )
        };
        assert!(encode(0, 0, 0).unwrap_err().is_configuration());
        assert!(encode(5, 0, 1).unwrap_err().is_configuration());
        assert!(encode(3, 3, 0).unwrap_err().is_configuration());
        assert!(encode(3, 0, 3).unwrap_err().is_configuration());
        assert!(encode(3, 1, 1).unwrap_err().is_configuration());
        assert!(encode(4, 3, 0).is_ok());
    }

    #[test]
    fn encode_rejects_unsupported_actions_and_zero_pool() {
        let err = RouteDescriptor::encode(
            POOL,
            PoolType::UniswapV2,
            2,
            0,
            1,
            Action::RemoveLiquidity,
            U256::ZERO,
        )
        .unwrap_err();
        assert!(err.to_string().contains("uniswap-v2"));

        let err = RouteDescriptor::encode(
            Address::ZERO,
            PoolType::UniswapV2,
            2,
            0,
            1,
            Action::Swap,
            U256::ZERO,
        )
        .unwrap_err();
        assert!(err.is_configuration());

        let err = RouteDescriptor::encode(
            POOL,
            PoolType::LidoWrap,
            2,
            0,
            1,
            Action::AddLiquidity,
            U256::ZERO,
        )
        .unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn encode_rejects_oversized_metadata() {
        let err = RouteDescriptor::encode(
            POOL,
            PoolType::UniswapV2,
            2,
            0,
            1,
            Action::Swap,
            U256::from(1u64) << 80usize,
        )
        .unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn resolve_rejects_unknown_tags() {
        let base = RouteDescriptor::encode(
            POOL,
            PoolType::CurveBasePool,
            2,
            0,
            1,
            Action::Swap,
            U256::ZERO,
        )
        .unwrap()
        .word();

        let type_mask: U256 = U256::from(0xffu64) << 160usize;
        let unknown_type = (base & !type_mask) | (U256::from(200u64) << 160usize);
        assert!(
            RouteDescriptor::from_word(unknown_type)
                .resolve()
                .unwrap_err()
                .to_string()
                .contains("unknown pool type tag 200")
        );

        let unknown_action = base | U256::from(3u64) << 174usize;
        assert!(
            RouteDescriptor::from_word(unknown_action)
                .resolve()
                .unwrap_err()
                .is_configuration()
        );

        let index_out_of_range = base | U256::from(3u64) << 170usize;
        assert!(
            RouteDescriptor::from_word(index_out_of_range)
                .resolve()
                .unwrap_err()
                .is_configuration()
        );
    }

    #[test]
    fn parses_names_tags_and_hex_words() {
        assert_eq!("curve-tricrypto".parse::<PoolType>().unwrap(), PoolType::CurveTriCryptoPool);
        assert_eq!("LIDO_WRAP".parse::<PoolType>().unwrap(), PoolType::LidoWrap);
        assert_eq!("2".parse::<PoolType>().unwrap(), PoolType::BalancerV2);
        assert!("20".parse::<PoolType>().is_err());
        assert_eq!("remove".parse::<Action>().unwrap(), Action::RemoveLiquidity);

        let descriptor = RouteDescriptor::encode(
            POOL,
            PoolType::UniswapV2,
            2,
            1,
            0,
            Action::Swap,
            U256::ZERO,
        )
        .unwrap();
        let text = descriptor.to_string();
        assert_eq!(text.len(), 66);
        assert_eq!(text.parse::<RouteDescriptor>().unwrap(), descriptor);
    }
}
