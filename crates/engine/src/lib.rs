// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
// Enable coverage(off) attribute for excluding test infrastructure
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Nutrilog entry store: single-writer mutations, retries, compression
//! and cache eviction over the persistent collections

mod cache;
mod compress;
mod error;
mod guard;
mod maintenance;
mod retry;
mod store;
mod sweeper;

pub use cache::NutritionCache;
pub use compress::{Compressed, CompressError, JpegEncoder, PayloadCompressor, PayloadEncoder};
pub use error::{ErrorKind, LastError, StoreError};
pub use guard::{WriteGuard, WriterFlag};
pub use maintenance::{
    Maintenance, MaintenanceError, MaintenanceMarker, MaintenanceReport, MarkerError,
};
pub use store::{EntryStore, PhotoCleanup};
pub use sweeper::CacheSweeper;

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
pub use compress::FakeEncoder;
