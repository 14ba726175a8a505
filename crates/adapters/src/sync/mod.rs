// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Wellness sync: hands committed entries to an external health store

mod noop;

pub use noop::NoOpWellnessSync;

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::FakeWellnessSync;

use async_trait::async_trait;
use nl_core::Entry;
use thiserror::Error;

/// Errors from wellness sync
#[derive(Debug, Clone, Error)]
pub enum SyncError {
    #[error("wellness store unavailable: {0}")]
    Unavailable(String),
    #[error("entry rejected: {0}")]
    Rejected(String),
}

/// Best-effort export of committed entries.
///
/// Failures never affect the entry store; callers only log them.
#[async_trait]
pub trait WellnessSync: Send + Sync + 'static {
    async fn record(&self, entry: &Entry) -> Result<(), SyncError>;
}
