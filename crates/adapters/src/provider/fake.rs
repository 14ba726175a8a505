// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake nutrition provider for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{Candidate, NutritionProvider, NutritionRecord, ProviderError};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Recorded provider call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderCall {
    Search(String),
    Lookup(String),
}

#[derive(Default)]
struct FakeProviderState {
    records: HashMap<String, NutritionRecord>,
    candidates: Vec<Candidate>,
    failure: Option<ProviderError>,
    calls: Vec<ProviderCall>,
}

/// Fake provider serving canned records
#[derive(Clone, Default)]
pub struct FakeNutritionProvider {
    state: Arc<Mutex<FakeProviderState>>,
}

impl FakeNutritionProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `record` for lookups of its identifier
    pub fn add_record(&self, record: NutritionRecord) {
        let mut state = self.lock();
        state.records.insert(record.identifier.clone(), record);
    }

    /// Return `candidates` for every search
    pub fn set_candidates(&self, candidates: Vec<Candidate>) {
        self.lock().candidates = candidates;
    }

    /// Fail every subsequent call, or stop failing with `None`
    pub fn set_failure(&self, failure: Option<ProviderError>) {
        self.lock().failure = failure;
    }

    pub fn calls(&self) -> Vec<ProviderCall> {
        self.lock().calls.clone()
    }

    /// Number of lookup calls made
    pub fn lookup_count(&self) -> usize {
        self.lock()
            .calls
            .iter()
            .filter(|c| matches!(c, ProviderCall::Lookup(_)))
            .count()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, FakeProviderState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl NutritionProvider for FakeNutritionProvider {
    async fn search(&self, query: &str) -> Result<Vec<Candidate>, ProviderError> {
        let mut state = self.lock();
        state.calls.push(ProviderCall::Search(query.to_string()));
        if let Some(e) = &state.failure {
            return Err(e.clone());
        }
        Ok(state.candidates.clone())
    }

    async fn lookup(&self, identifier: &str) -> Result<Option<NutritionRecord>, ProviderError> {
        let mut state = self.lock();
        state.calls.push(ProviderCall::Lookup(identifier.to_string()));
        if let Some(e) = &state.failure {
            return Err(e.clone());
        }
        Ok(state.records.get(identifier).cloned())
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
