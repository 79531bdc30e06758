// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@oxidity.com>

use alloy::primitives::{Address, U256};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Initialization failed: {0}")]
    Initialization(String),

    #[error("Validation failed for field {field}: {message}")]
    Validation { field: String, message: String },

    #[error("Address {0} is invalid or not checksummed")]
    InvalidAddress(String),

    #[error(transparent)]
    Zap(#[from] ZapError),

    #[error(transparent)]
    Unknown(#[from] anyhow::Error),
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::Config(err.to_string())
    }
}

/// Failures surfaced by the routing engine. Every variant is terminal for the zap
/// that produced it; nothing is retried and nothing is partially applied.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ZapError {
    /// Operator mistake in route or registry setup.
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Slippage exceeded: minimum out {min_out}, realized {amount_out}")]
    Slippage { min_out: U256, amount_out: U256 },

    /// A pool or token call failed; `reason` carries the callee's diagnostic verbatim.
    #[error("External call to {target} failed: {reason}")]
    ExternalCall { target: Address, reason: String },

    #[error("Caller {0} is not the owner")]
    Unauthorized(Address),

    #[error("Attached native value {attached} does not match expected {expected}")]
    Value { expected: U256, attached: U256 },
}

impl ZapError {
    pub fn config(message: impl Into<String>) -> Self {
        ZapError::Configuration(message.into())
    }

    pub fn is_configuration(&self) -> bool {
        matches!(self, ZapError::Configuration(_))
    }
}

/// Failures raised by the execution host while moving balances or running contract code.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HostError {
    #[error("call to {target} reverted: {reason}")]
    Revert { target: Address, reason: String },

    #[error("no contract code at {0}")]
    NoCode(Address),

    #[error("insufficient balance of {token} for {holder}: need {needed}, have {available}")]
    InsufficientBalance {
        token: Address,
        holder: Address,
        needed: U256,
        available: U256,
    },

    #[error("insufficient allowance of {token} from {owner} to {spender}: need {needed}, have {available}")]
    InsufficientAllowance {
        token: Address,
        owner: Address,
        spender: Address,
        needed: U256,
        available: U256,
    },
}

impl HostError {
    /// Contract or token the failure is attributed to.
    pub fn target(&self) -> Address {
        match self {
            HostError::Revert { target, .. } => *target,
            HostError::NoCode(target) => *target,
            HostError::InsufficientBalance { token, .. }
            | HostError::InsufficientAllowance { token, .. } => *token,
        }
    }
}

impl From<HostError> for ZapError {
    fn from(err: HostError) -> Self {
        ZapError::ExternalCall {
            target: err.target(),
            reason: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::address;

    #[test]
    fn host_errors_map_to_external_call_with_target() {
        let token = address!("00000000000000000000000000000000000000aa");
        let err = HostError::InsufficientBalance {
            token,
            holder: Address::ZERO,
            needed: U256::from(2u64),
            available: U256::from(1u64),
        };
        match ZapError::from(err) {
            ZapError::ExternalCall { target, reason } => {
                assert_eq!(target, token);
                assert!(reason.contains("need 2, have 1"));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn zap_errors_lift_into_app_errors() {
        let app: AppError = ZapError::config("empty route").into();
        assert!(app.to_string().contains("empty route"));
    }
}
