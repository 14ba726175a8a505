// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Traced adapter wrappers for consistent observability

use crate::provider::{Candidate, NutritionProvider, NutritionRecord, ProviderError};
use crate::sync::{SyncError, WellnessSync};
use async_trait::async_trait;
use nl_core::Entry;
use tracing::Instrument;

/// Wrapper that adds tracing to any WellnessSync
#[derive(Clone)]
pub struct TracedWellnessSync<S> {
    inner: S,
}

impl<S> TracedWellnessSync<S> {
    pub fn new(inner: S) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl<S: WellnessSync> WellnessSync for TracedWellnessSync<S> {
    async fn record(&self, entry: &Entry) -> Result<(), SyncError> {
        let span = tracing::info_span!("sync.record", entry_id = %entry.id);

        async {
            tracing::debug!(food_name = %entry.food_name, "exporting");

            let start = std::time::Instant::now();
            let result = self.inner.record(entry).await;
            let elapsed = start.elapsed();

            // Sync is best-effort; failures surface as warnings only
            match &result {
                Ok(()) => tracing::info!(elapsed_ms = elapsed.as_millis() as u64, "entry exported"),
                Err(e) => tracing::warn!(
                    elapsed_ms = elapsed.as_millis() as u64,
                    error = %e,
                    "export failed"
                ),
            }

            result
        }
        .instrument(span)
        .await
    }
}

/// Wrapper that adds tracing to any NutritionProvider
#[derive(Clone)]
pub struct TracedNutritionProvider<N> {
    inner: N,
}

impl<N> TracedNutritionProvider<N> {
    pub fn new(inner: N) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl<N: NutritionProvider> NutritionProvider for TracedNutritionProvider<N> {
    async fn search(&self, query: &str) -> Result<Vec<Candidate>, ProviderError> {
        let span = tracing::info_span!("provider.search", query);

        async {
            // Precondition: blank queries never reach the provider
            if query.trim().is_empty() {
                tracing::debug!("empty query");
                return Ok(Vec::new());
            }

            let start = std::time::Instant::now();
            let result = self.inner.search(query).await;
            let elapsed = start.elapsed();

            match &result {
                Ok(candidates) => tracing::info!(
                    count = candidates.len(),
                    elapsed_ms = elapsed.as_millis() as u64,
                    "search complete"
                ),
                Err(e) => tracing::error!(
                    elapsed_ms = elapsed.as_millis() as u64,
                    error = %e,
                    "search failed"
                ),
            }

            result
        }
        .instrument(span)
        .await
    }

    async fn lookup(&self, identifier: &str) -> Result<Option<NutritionRecord>, ProviderError> {
        let span = tracing::info_span!("provider.lookup", identifier);

        async {
            let start = std::time::Instant::now();
            let result = self.inner.lookup(identifier).await;
            let elapsed = start.elapsed();

            match &result {
                Ok(record) => tracing::info!(
                    found = record.is_some(),
                    elapsed_ms = elapsed.as_millis() as u64,
                    "lookup complete"
                ),
                Err(e) => tracing::error!(
                    elapsed_ms = elapsed.as_millis() as u64,
                    error = %e,
                    "lookup failed"
                ),
            }

            result
        }
        .instrument(span)
        .await
    }
}

#[cfg(test)]
#[path = "traced_tests.rs"]
mod tests;
