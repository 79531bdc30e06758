// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@mitander.dev>

use alloy::primitives::U256;

pub fn strip_0x(s: &str) -> &str {
    s.strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .unwrap_or(s)
}

pub fn is_hex_prefixed(s: &str) -> bool {
    s.starts_with("0x") || s.starts_with("0X")
}

pub fn parse_u256_hex(s: &str) -> Option<U256> {
    let digits = strip_0x(s);
    if digits.is_empty() || digits.len() > 64 {
        return None;
    }
    U256::from_str_radix(digits, 16).ok()
}

/// `0x`-prefixed hex or plain decimal; underscores are accepted as separators.
pub fn parse_u256(s: &str) -> Option<U256> {
    let cleaned = s.trim().replace('_', "");
    if is_hex_prefixed(&cleaned) {
        return parse_u256_hex(&cleaned);
    }
    if cleaned.is_empty() || !cleaned.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    U256::from_str_radix(&cleaned, 10).ok()
}
