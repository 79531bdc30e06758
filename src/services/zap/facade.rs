// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@oxidity.com>

//! User-facing zap entry points.
//!
//! A zap pulls the caller's input onto the facade, runs the registered route with the
//! facade as the executing account, enforces the caller's minimum and pays the output
//! back. The whole sequence runs inside one host checkpoint; on any error the caller's
//! balances are exactly as they were.

use crate::common::constants::{NATIVE_ASSET, is_native};
use crate::common::error::ZapError;
use crate::infrastructure::host::{Host, atomically};
use crate::services::zap::adapters::ExecutionContext;
use crate::services::zap::descriptor::RouteDescriptor;
use crate::services::zap::events::ZapEvent;
use crate::services::zap::executor::SwapExecutor;
use crate::services::zap::registry::RouteRegistry;
use alloy::primitives::{Address, U256};
use std::sync::Arc;

/// Who is calling and how much native value they attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Invocation {
    pub caller: Address,
    pub value: U256,
}

impl Invocation {
    pub fn new(caller: Address) -> Self {
        Self {
            caller,
            value: U256::ZERO,
        }
    }

    pub fn with_value(mut self, value: U256) -> Self {
        self.value = value;
        self
    }
}

/// Zap facade. Mutating entry points take `&mut self`, so a pool cannot call back
/// into the facade that is executing it.
pub struct Zap {
    address: Address,
    executor: Arc<SwapExecutor>,
    registry: RouteRegistry,
    events: Vec<ZapEvent>,
}

impl Zap {
    pub fn new(address: Address, owner: Address, executor: Arc<SwapExecutor>) -> Self {
        Self {
            address,
            executor,
            registry: RouteRegistry::new(owner),
            events: Vec::new(),
        }
    }

    /// Account that holds funds while a route executes.
    pub fn address(&self) -> Address {
        self.address
    }

    pub fn registry(&self) -> &RouteRegistry {
        &self.registry
    }

    pub fn executor(&self) -> &Arc<SwapExecutor> {
        &self.executor
    }

    pub fn events(&self) -> &[ZapEvent] {
        &self.events
    }

    pub fn drain_events(&mut self) -> Vec<ZapEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn update_route(
        &mut self,
        caller: Address,
        src: Address,
        dst: Address,
        route: Vec<RouteDescriptor>,
    ) -> Result<(), ZapError> {
        let event = self.registry.update_route(caller, src, dst, route)?;
        self.events.push(event);
        Ok(())
    }

    pub fn update_pool_tokens(
        &mut self,
        caller: Address,
        pools: &[Address],
        receipt_tokens: &[Address],
    ) -> Result<(), ZapError> {
        let events = self
            .registry
            .update_pool_tokens(caller, pools, receipt_tokens)?;
        self.events.extend(events);
        Ok(())
    }

    pub fn transfer_ownership(&mut self, caller: Address, new_owner: Address) -> Result<(), ZapError> {
        let event = self.registry.transfer_ownership(caller, new_owner)?;
        self.events.push(event);
        Ok(())
    }

    /// Deposit direction: `src` into `dst` along the registered route.
    pub fn zap_from(
        &mut self,
        host: &mut dyn Host,
        invocation: Invocation,
        src: Address,
        amount_in: U256,
        dst: Address,
        min_out: U256,
    ) -> Result<U256, ZapError> {
        let route = self.registered_route(src, dst)?;
        self.run(host, invocation, src, amount_in, &route, dst, min_out)
    }

    /// Withdrawal direction: out of a pool's receipt token along the route registered
    /// for `(receipt_token, dst)`. The receipt token may be a registry entry or a
    /// family default such as a factory pool's own LP token.
    pub fn zap_to(
        &mut self,
        host: &mut dyn Host,
        invocation: Invocation,
        receipt_token: Address,
        amount_in: U256,
        dst: Address,
        min_out: U256,
    ) -> Result<U256, ZapError> {
        let route = self.registered_route(receipt_token, dst)?;
        self.run(host, invocation, receipt_token, amount_in, &route, dst, min_out)
    }

    /// Same guarantees as [`Zap::zap_from`] along a caller-supplied route.
    pub fn zap_with_route(
        &mut self,
        host: &mut dyn Host,
        invocation: Invocation,
        src: Address,
        amount_in: U256,
        route: &[RouteDescriptor],
        dst: Address,
        min_out: U256,
    ) -> Result<U256, ZapError> {
        self.run(host, invocation, src, amount_in, route, dst, min_out)
    }

    /// Sends the facade's whole balance of each token to `recipient`.
    pub fn rescue(
        &mut self,
        host: &mut dyn Host,
        caller: Address,
        tokens: &[Address],
        recipient: Address,
    ) -> Result<Vec<(Address, U256)>, ZapError> {
        self.registry.ensure_owner(caller)?;
        if recipient == Address::ZERO {
            return Err(ZapError::config("rescue recipient is the zero address"));
        }
        let holder = self.address;
        atomically(host, |host| {
            let mut swept = Vec::with_capacity(tokens.len());
            for token in tokens {
                let balance = host.balance_of(*token, holder);
                if balance.is_zero() {
                    continue;
                }
                host.transfer(*token, holder, recipient, balance)?;
                tracing::info!(target: "zap", %token, %recipient, amount = %balance, "Rescued");
                swept.push((*token, balance));
            }
            Ok(swept)
        })
    }

    fn registered_route(&self, src: Address, dst: Address) -> Result<Vec<RouteDescriptor>, ZapError> {
        self.registry
            .route(src, dst)
            .map(<[RouteDescriptor]>::to_vec)
            .ok_or_else(|| ZapError::config(format!("no route registered from {src} to {dst}")))
    }

    fn run(
        &mut self,
        host: &mut dyn Host,
        invocation: Invocation,
        src: Address,
        amount_in: U256,
        route: &[RouteDescriptor],
        dst: Address,
        min_out: U256,
    ) -> Result<U256, ZapError> {
        let result = atomically(host, |host| {
            self.settle(host, invocation, src, amount_in, route, dst, min_out)
        });
        let (received, amount_out) = match result {
            Ok(amounts) => amounts,
            Err(e) => {
                tracing::warn!(
                    target: "zap",
                    caller = %invocation.caller,
                    %src,
                    %dst,
                    %amount_in,
                    error = %e,
                    "Zap reverted"
                );
                return Err(e);
            }
        };

        tracing::info!(
            target: "zap",
            caller = %invocation.caller,
            %src,
            %dst,
            amount_in = %received,
            %amount_out,
            hops = route.len(),
            "Zapped"
        );
        self.events.push(ZapEvent::Zapped {
            caller: invocation.caller,
            src,
            dst,
            amount_in: received,
            amount_out,
        });
        Ok(amount_out)
    }

    fn settle(
        &self,
        host: &mut dyn Host,
        invocation: Invocation,
        src: Address,
        amount_in: U256,
        route: &[RouteDescriptor],
        dst: Address,
        min_out: U256,
    ) -> Result<(U256, U256), ZapError> {
        let received = self.pull_input(host, invocation, src, amount_in)?;
        let dst_before = host.balance_of(dst, self.address);

        let mut ctx = ExecutionContext::new(host, self.address, &self.registry);
        self.executor.execute_route(&mut ctx, route, received)?;

        let amount_out = host.balance_of(dst, self.address).saturating_sub(dst_before);
        if amount_out < min_out {
            return Err(ZapError::Slippage {
                min_out,
                amount_out,
            });
        }
        host.transfer(dst, self.address, invocation.caller, amount_out)?;
        Ok((received, amount_out))
    }

    /// Moves the input onto the facade and returns the amount that actually arrived.
    fn pull_input(
        &self,
        host: &mut dyn Host,
        invocation: Invocation,
        src: Address,
        amount_in: U256,
    ) -> Result<U256, ZapError> {
        let before = host.balance_of(src, self.address);
        if is_native(src) {
            if invocation.value != amount_in {
                return Err(ZapError::Value {
                    expected: amount_in,
                    attached: invocation.value,
                });
            }
            host.transfer(NATIVE_ASSET, invocation.caller, self.address, amount_in)?;
        } else {
            if !invocation.value.is_zero() {
                return Err(ZapError::Value {
                    expected: U256::ZERO,
                    attached: invocation.value,
                });
            }
            host.transfer_from(src, self.address, invocation.caller, self.address, amount_in)?;
        }
        Ok(host.balance_of(src, self.address).saturating_sub(before))
    }
}
