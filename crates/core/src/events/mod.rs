// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-process notifications for store consumers.
//!
//! The store publishes a [`StoreEvent`](crate::StoreEvent) after every
//! committed mutation; UI layers subscribe with name patterns.

mod bus;
mod subscription;

pub use bus::{EventBus, EventReceiver, EventSender};
pub use subscription::{EventPattern, SubscriberId, Subscription};
