// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! TTL sweep of cached lookup records

use crate::error::StoreError;
use crate::store::EntryStore;
use nl_core::{Clock, StoreEvent, SystemClock};
use nl_storage::{Operation, Persistence};
use std::sync::Arc;

/// Deletes expired cache records in one pass.
///
/// Shares the store's writer flag, so a sweep is rejected while any other
/// mutation is in flight.
pub struct CacheSweeper<P: Persistence, C: Clock = SystemClock> {
    store: Arc<EntryStore<P, C>>,
}

impl<P: Persistence, C: Clock> CacheSweeper<P, C> {
    pub fn new(store: Arc<EntryStore<P, C>>) -> Self {
        Self { store }
    }

    /// Delete every record older than its TTL, returning how many went
    pub async fn sweep(&self) -> Result<usize, StoreError> {
        let result = self.sweep_inner().await;
        self.store.record_outcome("sweep", result)
    }

    async fn sweep_inner(&self) -> Result<usize, StoreError> {
        let _guard = self.store.writer().try_acquire("sweep")?;

        let now = self.store.clock().now();
        let expired: Vec<String> = self.store.read_persistence(|p| {
            p.read(|c| {
                c.cache
                    .values()
                    .filter(|r| r.is_expired(now))
                    .map(|r| r.key.clone())
                    .collect()
            })
        })?;

        if expired.is_empty() {
            tracing::debug!("no expired cache records");
            return Ok(0);
        }

        let deleted = expired.len();
        self.store
            .commit("sweep", vec![Operation::CacheDelete { keys: expired }])
            .await?;

        tracing::info!(deleted, "cache swept");
        self.store
            .events()
            .publish(StoreEvent::CacheSwept { deleted });
        Ok(deleted)
    }
}

impl<P: Persistence, C: Clock> Clone for CacheSweeper<P, C> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

#[cfg(test)]
#[path = "sweeper_tests.rs"]
mod tests;
