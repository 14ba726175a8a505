// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! No-op wellness sync for when no external store is connected.

use super::{SyncError, WellnessSync};
use async_trait::async_trait;
use nl_core::Entry;

#[derive(Clone, Copy, Debug, Default)]
pub struct NoOpWellnessSync;

impl NoOpWellnessSync {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl WellnessSync for NoOpWellnessSync {
    async fn record(&self, _entry: &Entry) -> Result<(), SyncError> {
        Ok(())
    }
}
