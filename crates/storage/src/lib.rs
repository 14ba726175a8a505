// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
// Enable coverage(off) attribute for excluding test infrastructure
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! nl-storage: Durable collections for the nutrilog store
//!
//! Entries and cache records live in memory and are made durable through
//! an append-only log of operation batches.

pub mod error;
pub mod operation;
pub mod persistence;
pub mod state;
pub mod wal;
pub mod wal_store;

#[cfg(any(test, feature = "test-support"))]
pub mod fake;

pub use error::StorageError;
pub use operation::Operation;
pub use persistence::{MemoryPersistence, Persistence};
pub use state::Collections;
pub use wal::{WalEntry, WalReader, WalWriter};
pub use wal_store::{CompactionResult, WalConfig, WalPersistence};

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
pub use fake::{CommitGate, FakePersistence};
