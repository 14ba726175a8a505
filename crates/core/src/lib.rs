// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! nl-core: Shared data model for the nutrilog store
//!
//! This crate provides:
//! - Entry and cache-record definitions with validation rules
//! - Size, retention and retry limits
//! - Clock and id abstractions for deterministic tests
//! - Store configuration loaded from TOML
//! - Change events and the event bus that delivers them

pub mod cache;
pub mod calendar;
pub mod clock;
pub mod config;
pub mod entry;
pub mod event;
pub mod events;
pub mod id;
pub mod limits;
pub mod payload;

pub use cache::CacheRecord;
pub use calendar::Calendar;
pub use clock::{Clock, FakeClock, SystemClock};
pub use config::{ConfigError, RetryConfig, StoreConfig};
pub use entry::{
    validate_food_name, Entry, EntryDraft, EntryId, EntrySource, Macros, Serving,
    ValidationError,
};
pub use event::StoreEvent;
pub use events::{EventBus, EventPattern, EventReceiver, SubscriberId, Subscription};
pub use id::{IdGen, SequentialIdGen, UuidIdGen};
pub use payload::Payload;
