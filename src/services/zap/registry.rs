// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@oxidity.com>

use crate::common::error::ZapError;
use crate::services::zap::adapters::ReceiptTokenLookup;
use crate::services::zap::descriptor::RouteDescriptor;
use crate::services::zap::events::ZapEvent;
use alloy::primitives::Address;
use std::collections::HashMap;

/// Owner-administered routes and pool receipt tokens.
///
/// Every mutation checks the caller first, applies in full or not at all, and bumps
/// [`RouteRegistry::version`].
#[derive(Debug, Clone)]
pub struct RouteRegistry {
    owner: Address,
    routes: HashMap<(Address, Address), Vec<RouteDescriptor>>,
    pool_tokens: HashMap<Address, Address>,
    version: u64,
}

impl RouteRegistry {
    pub fn new(owner: Address) -> Self {
        Self {
            owner,
            routes: HashMap::new(),
            pool_tokens: HashMap::new(),
            version: 0,
        }
    }

    pub fn owner(&self) -> Address {
        self.owner
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    /// Registered route for `(src, dst)`. Empty routes are never stored.
    pub fn route(&self, src: Address, dst: Address) -> Option<&[RouteDescriptor]> {
        self.routes.get(&(src, dst)).map(Vec::as_slice)
    }

    pub fn routes(&self) -> impl Iterator<Item = (&(Address, Address), &Vec<RouteDescriptor>)> {
        self.routes.iter()
    }

    pub fn pool_token(&self, pool: Address) -> Option<Address> {
        self.pool_tokens.get(&pool).copied()
    }

    pub fn ensure_owner(&self, caller: Address) -> Result<(), ZapError> {
        if caller != self.owner {
            tracing::warn!(target: "registry", %caller, owner = %self.owner, "Unauthorized registry mutation");
            return Err(ZapError::Unauthorized(caller));
        }
        Ok(())
    }

    /// Overwrites the route for `(src, dst)`. An empty route removes the entry.
    pub fn update_route(
        &mut self,
        caller: Address,
        src: Address,
        dst: Address,
        route: Vec<RouteDescriptor>,
    ) -> Result<ZapEvent, ZapError> {
        self.ensure_owner(caller)?;
        let old_route = if route.is_empty() {
            self.routes.remove(&(src, dst))
        } else {
            self.routes.insert((src, dst), route.clone())
        }
        .unwrap_or_default();
        self.version += 1;
        tracing::info!(
            target: "registry",
            %src,
            %dst,
            hops = route.len(),
            version = self.version,
            "Route updated"
        );
        Ok(ZapEvent::RouteUpdated {
            src,
            dst,
            old_route,
            new_route: route,
        })
    }

    pub fn update_pool_tokens(
        &mut self,
        caller: Address,
        pools: &[Address],
        receipt_tokens: &[Address],
    ) -> Result<Vec<ZapEvent>, ZapError> {
        self.ensure_owner(caller)?;
        if pools.len() != receipt_tokens.len() {
            return Err(ZapError::config(format!(
                "{} pools but {} receipt tokens",
                pools.len(),
                receipt_tokens.len()
            )));
        }
        let mut events = Vec::with_capacity(pools.len());
        for (pool, token) in pools.iter().zip(receipt_tokens) {
            self.pool_tokens.insert(*pool, *token);
            events.push(ZapEvent::PoolTokenUpdated {
                pool: *pool,
                receipt_token: *token,
            });
        }
        self.version += 1;
        tracing::info!(
            target: "registry",
            entries = pools.len(),
            version = self.version,
            "Pool tokens updated"
        );
        Ok(events)
    }

    pub fn transfer_ownership(
        &mut self,
        caller: Address,
        new_owner: Address,
    ) -> Result<ZapEvent, ZapError> {
        self.ensure_owner(caller)?;
        if new_owner == Address::ZERO {
            return Err(ZapError::config("new owner is the zero address"));
        }
        let previous_owner = std::mem::replace(&mut self.owner, new_owner);
        self.version += 1;
        tracing::info!(target: "registry", %previous_owner, %new_owner, "Ownership transferred");
        Ok(ZapEvent::OwnershipTransferred {
            previous_owner,
            new_owner,
        })
    }
}

impl ReceiptTokenLookup for RouteRegistry {
    fn receipt_token(&self, pool: Address) -> Option<Address> {
        self.pool_token(pool)
    }
}
