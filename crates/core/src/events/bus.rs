// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fan-out of store events to pattern-filtered subscribers

use super::subscription::{SubscriberId, Subscription};
use crate::event::StoreEvent;
use std::sync::{Arc, RwLock};
use tokio::sync::mpsc;

/// Sender half handed to each subscriber slot
pub type EventSender = mpsc::UnboundedSender<StoreEvent>;
/// Receiver returned to the subscriber
pub type EventReceiver = mpsc::UnboundedReceiver<StoreEvent>;

struct Subscriber {
    subscription: Subscription,
    tx: EventSender,
}

/// Delivers each published event to every subscriber whose patterns match.
///
/// Clones share the subscriber list. Delivery never blocks: channels are
/// unbounded, and subscribers whose receiver is gone are dropped on the
/// next publish.
#[derive(Clone, Default)]
pub struct EventBus {
    subscribers: Arc<RwLock<Vec<Subscriber>>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `subscription`, replacing any existing one with the same id
    pub fn subscribe(&self, subscription: Subscription) -> EventReceiver {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut subs = self.subscribers.write().unwrap_or_else(|e| e.into_inner());
        subs.retain(|s| s.subscription.id != subscription.id);
        subs.push(Subscriber { subscription, tx });
        rx
    }

    pub fn unsubscribe(&self, id: &SubscriberId) {
        self.subscribers
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .retain(|s| &s.subscription.id != id);
    }

    /// Send `event` to matching subscribers; returns how many received it
    pub fn publish(&self, event: StoreEvent) -> usize {
        let name = event.name();
        let mut delivered = 0;
        let mut closed = false;

        for sub in self
            .subscribers
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .filter(|s| s.subscription.matches(&name))
        {
            if sub.tx.send(event.clone()).is_ok() {
                delivered += 1;
            } else {
                closed = true;
            }
        }

        if closed {
            let mut subs = self.subscribers.write().unwrap_or_else(|e| e.into_inner());
            let before = subs.len();
            subs.retain(|s| !s.tx.is_closed());
            tracing::debug!(dropped = before - subs.len(), "pruned closed subscribers");
        }
        tracing::trace!(event = %name, delivered, "event published");
        delivered
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .len()
    }
}

#[cfg(test)]
#[path = "bus_tests.rs"]
mod tests;
