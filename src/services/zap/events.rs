// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@oxidity.com>

use crate::services::zap::descriptor::RouteDescriptor;
use alloy::primitives::{Address, U256};
use serde::Serialize;

/// Audit trail emitted by the facade and its registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "PascalCase")]
pub enum ZapEvent {
    RouteUpdated {
        src: Address,
        dst: Address,
        old_route: Vec<RouteDescriptor>,
        new_route: Vec<RouteDescriptor>,
    },
    PoolTokenUpdated {
        pool: Address,
        receipt_token: Address,
    },
    Zapped {
        caller: Address,
        src: Address,
        dst: Address,
        amount_in: U256,
        amount_out: U256,
    },
    OwnershipTransferred {
        previous_owner: Address,
        new_owner: Address,
    },
}
