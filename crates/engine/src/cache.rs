// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Read-through cache of nutrition lookups

use crate::error::StoreError;
use crate::store::EntryStore;
use nl_adapters::{
    Candidate, NutritionProvider, NutritionRecord, ProviderError, TracedNutritionProvider,
};
use nl_core::{CacheRecord, Clock, StoreEvent, SystemClock};
use nl_storage::{Operation, Persistence};
use std::sync::Arc;

/// Serves provider lookups from unexpired [`CacheRecord`]s.
///
/// Cache writes go through the store's writer discipline. A write that is
/// rejected or fails is logged and the fresh result is still returned.
pub struct NutritionCache<N, P: Persistence, C: Clock = SystemClock> {
    store: Arc<EntryStore<P, C>>,
    provider: TracedNutritionProvider<N>,
}

impl<N: NutritionProvider, P: Persistence, C: Clock> NutritionCache<N, P, C> {
    pub fn new(store: Arc<EntryStore<P, C>>, provider: N) -> Self {
        Self {
            store,
            provider: TracedNutritionProvider::new(provider),
        }
    }

    pub async fn lookup(&self, identifier: &str) -> Result<Option<NutritionRecord>, ProviderError> {
        if let Some(hit) = self.cached(identifier) {
            tracing::debug!(identifier, "cache hit");
            return Ok(Some(hit));
        }

        let Some(record) = self.provider.lookup(identifier).await? else {
            return Ok(None);
        };

        if let Err(e) = self.store_record(identifier, &record).await {
            tracing::warn!(identifier, error = %e, "lookup result not cached");
        }
        Ok(Some(record))
    }

    /// Free-text search, never cached
    pub async fn search(&self, query: &str) -> Result<Vec<Candidate>, ProviderError> {
        self.provider.search(query).await
    }

    fn cached(&self, key: &str) -> Option<NutritionRecord> {
        let record = match self.store.read_persistence(|p| p.cache_record(key)) {
            Ok(record) => record?,
            Err(e) => {
                tracing::warn!(key, error = %e, "cache read failed");
                return None;
            }
        };
        if record.is_expired(self.store.clock().now()) {
            return None;
        }

        match serde_json::from_slice(record.payload.as_bytes()) {
            Ok(decoded) => Some(decoded),
            Err(e) => {
                tracing::warn!(key, error = %e, "discarding undecodable cache record");
                None
            }
        }
    }

    async fn store_record(&self, key: &str, record: &NutritionRecord) -> Result<(), StoreError> {
        let result = self.store_record_inner(key, record).await;
        self.store.record_outcome("cache_put", result)
    }

    async fn store_record_inner(
        &self,
        key: &str,
        record: &NutritionRecord,
    ) -> Result<(), StoreError> {
        let _guard = self.store.writer().try_acquire("cache_put")?;

        // Nothing was written if serialization fails
        let payload = serde_json::to_vec(record).map_err(|e| StoreError::Persistence {
            attempts: 0,
            source: e.into(),
        })?;
        let cached = CacheRecord::new(
            key,
            payload,
            self.store.clock().now(),
            self.store.config().cache_ttl,
        );

        self.store
            .commit("cache_put", vec![Operation::CachePut { record: cached }])
            .await?;

        tracing::debug!(key, "lookup cached");
        self.store.events().publish(StoreEvent::CacheStored {
            key: key.to_string(),
        });
        Ok(())
    }
}

#[cfg(test)]
#[path = "cache_tests.rs"]
mod tests;
