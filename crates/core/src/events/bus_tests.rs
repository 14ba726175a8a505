// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::entry::EntryId;
use crate::events::EventPattern;

fn deleted(id: &str) -> StoreEvent {
    StoreEvent::EntryDeleted {
        id: EntryId::new(id),
    }
}

fn watching(id: &str, pattern: &str) -> Subscription {
    Subscription::new(id, vec![EventPattern::new(pattern)], pattern)
}

#[test]
fn matching_subscriber_receives_event() {
    let bus = EventBus::new();
    let mut rx = bus.subscribe(watching("ui", "entry:*"));

    assert_eq!(bus.publish(deleted("e-1")), 1);

    let event = rx.try_recv().unwrap();
    assert!(matches!(event, StoreEvent::EntryDeleted { id } if id.as_str() == "e-1"));
}

#[test]
fn other_categories_are_filtered_out() {
    let bus = EventBus::new();
    let mut entries = bus.subscribe(watching("entries", "entry:*"));
    let mut cache = bus.subscribe(watching("cache", "cache:**"));

    assert_eq!(bus.publish(StoreEvent::CacheSwept { deleted: 3 }), 1);

    assert!(entries.try_recv().is_err());
    assert_eq!(cache.try_recv().unwrap(), StoreEvent::CacheSwept { deleted: 3 });
}

#[test]
fn resubscribing_replaces_the_old_channel() {
    let bus = EventBus::new();
    let _old = bus.subscribe(watching("ui", "**"));
    let mut new = bus.subscribe(watching("ui", "**"));

    assert_eq!(bus.subscriber_count(), 1);
    bus.publish(deleted("e-2"));
    assert!(new.try_recv().is_ok());
}

#[test]
fn unsubscribe_stops_delivery() {
    let bus = EventBus::new();
    let _rx = bus.subscribe(watching("ui", "**"));

    bus.unsubscribe(&SubscriberId("ui".to_string()));

    assert_eq!(bus.subscriber_count(), 0);
    assert_eq!(bus.publish(deleted("e-1")), 0);
}

#[test]
fn dropped_receivers_are_pruned_on_publish() {
    let bus = EventBus::new();
    drop(bus.subscribe(watching("gone", "**")));
    let _kept = bus.subscribe(watching("kept", "**"));

    assert_eq!(bus.publish(deleted("e-1")), 1);
    assert_eq!(bus.subscriber_count(), 1);
}

#[test]
fn clones_share_subscribers() {
    let bus = EventBus::new();
    let other = bus.clone();
    let mut rx = bus.subscribe(watching("ui", "**"));

    other.publish(StoreEvent::EntriesReloaded { count: 4 });

    assert_eq!(rx.try_recv().unwrap(), StoreEvent::EntriesReloaded { count: 4 });
}
