// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
// Enable coverage(off) attribute for excluding test infrastructure
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Collaborators the entry store talks to

pub mod provider;
pub mod sync;
pub mod traced;

pub use provider::{Candidate, NutritionProvider, NutritionRecord, ProviderError};
pub use sync::{NoOpWellnessSync, SyncError, WellnessSync};
pub use traced::{TracedNutritionProvider, TracedWellnessSync};

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
pub use provider::{FakeNutritionProvider, ProviderCall};
#[cfg(any(test, feature = "test-support"))]
pub use sync::FakeWellnessSync;
