// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake wellness sync for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{SyncError, WellnessSync};
use async_trait::async_trait;
use nl_core::{Entry, EntryId};
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

#[derive(Default)]
struct FakeSyncState {
    recorded: Vec<EntryId>,
    failure: Option<SyncError>,
}

/// Fake wellness sync that records the ids it was handed
#[derive(Clone, Default)]
pub struct FakeWellnessSync {
    state: Arc<Mutex<FakeSyncState>>,
    notify: Arc<Notify>,
}

impl FakeWellnessSync {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail every subsequent call with the given error
    pub fn fail_with(&self, error: SyncError) {
        self.state.lock().unwrap_or_else(|e| e.into_inner()).failure = Some(error);
    }

    /// Ids of every entry handed to `record`, including failed calls
    pub fn recorded(&self) -> Vec<EntryId> {
        self.state
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .recorded
            .clone()
    }

    /// Wait until at least `count` calls have been made
    pub async fn wait_for_calls(&self, count: usize) {
        loop {
            let notified = self.notify.notified();
            if self.recorded().len() >= count {
                return;
            }
            notified.await;
        }
    }
}

#[async_trait]
impl WellnessSync for FakeWellnessSync {
    async fn record(&self, entry: &Entry) -> Result<(), SyncError> {
        let result = {
            let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
            state.recorded.push(entry.id.clone());
            match &state.failure {
                Some(error) => Err(error.clone()),
                None => Ok(()),
            }
        };
        self.notify.notify_waiters();
        result
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
