// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@oxidity.com>

pub mod adapters;
pub mod descriptor;
pub mod events;
pub mod executor;
pub mod facade;
pub mod registry;
pub mod venues;

pub use adapters::{ExecutionContext, PoolAdapter, ReceiptTokenLookup};
pub use descriptor::{Action, Hop, PoolType, RouteDescriptor};
pub use events::ZapEvent;
pub use executor::SwapExecutor;
pub use facade::{Invocation, Zap};
pub use registry::RouteRegistry;
pub use venues::VenueBook;
