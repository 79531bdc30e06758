// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@oxidity.com>

use crate::common::error::ZapError;
use crate::services::zap::adapters::{ExecutionContext, HopEnv, PoolAdapter};
use crate::services::zap::descriptor::RouteDescriptor;
use crate::services::zap::venues::VenueBook;
use alloy::primitives::U256;

/// Stateless hop dispatcher. Holds only the venue book, so one instance can be
/// shared (`Arc`) by any number of facades.
#[derive(Debug, Clone, Default)]
pub struct SwapExecutor {
    venues: VenueBook,
}

impl SwapExecutor {
    pub fn new(venues: VenueBook) -> Self {
        Self { venues }
    }

    pub fn venues(&self) -> &VenueBook {
        &self.venues
    }

    /// Executes one descriptor. A failing hop leaves no state behind.
    pub fn swap(
        &self,
        ctx: &mut ExecutionContext<'_>,
        descriptor: RouteDescriptor,
        amount_in: U256,
    ) -> Result<U256, ZapError> {
        let hop = descriptor.resolve()?;
        let adapter = PoolAdapter::for_pool_type(hop.pool_type);

        let checkpoint = ctx.host.checkpoint();
        let result = adapter.execute(&mut HopEnv::new(ctx, &self.venues), &hop, amount_in);
        match &result {
            Ok(amount_out) => {
                ctx.host.commit(checkpoint);
                tracing::debug!(
                    target: "executor",
                    pool = %hop.pool,
                    pool_type = %hop.pool_type,
                    action = %hop.action,
                    %amount_in,
                    %amount_out,
                    "Hop executed"
                );
            }
            Err(e) => {
                ctx.host.revert_to(checkpoint);
                tracing::debug!(
                    target: "executor",
                    pool = %hop.pool,
                    pool_type = %hop.pool_type,
                    error = %e,
                    "Hop failed"
                );
            }
        }
        result
    }

    /// Threads `amount_in` through every hop in order. Any failure unwinds every
    /// earlier hop.
    pub fn execute_route(
        &self,
        ctx: &mut ExecutionContext<'_>,
        route: &[RouteDescriptor],
        amount_in: U256,
    ) -> Result<U256, ZapError> {
        if route.is_empty() {
            return Err(ZapError::config("route is empty"));
        }
        let checkpoint = ctx.host.checkpoint();
        let mut amount = amount_in;
        for (step, descriptor) in route.iter().enumerate() {
            match self.swap(ctx, *descriptor, amount) {
                Ok(out) => amount = out,
                Err(e) => {
                    ctx.host.revert_to(checkpoint);
                    tracing::warn!(
                        target: "executor",
                        step,
                        hops = route.len(),
                        error = %e,
                        "Route aborted"
                    );
                    return Err(e);
                }
            }
        }
        ctx.host.commit(checkpoint);
        Ok(amount)
    }
}
