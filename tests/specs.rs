//! Behavioral specifications for the nutrilog store.
//!
//! These tests are black-box: they drive the public API of the store over
//! a real write-ahead log in a temporary directory and check the results
//! a caller can observe.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

#[path = "specs/prelude.rs"]
mod prelude;

// entries/
#[path = "specs/entries/aggregates.rs"]
mod entries_aggregates;
#[path = "specs/entries/concurrency.rs"]
mod entries_concurrency;
#[path = "specs/entries/lifecycle.rs"]
mod entries_lifecycle;

// photos/
#[path = "specs/photos/cleanup.rs"]
mod photos_cleanup;

// cache/
#[path = "specs/cache/sweep.rs"]
mod cache_sweep;

// storage/
#[path = "specs/storage/recovery.rs"]
mod storage_recovery;
