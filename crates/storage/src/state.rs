// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Materialized collections built from WAL replay

use crate::operation::Operation;
use nl_core::{CacheRecord, Entry, EntryId};
use std::collections::HashMap;

/// The two persistent collections, as of the last applied batch
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Collections {
    pub entries: HashMap<EntryId, Entry>,
    pub cache: HashMap<String, CacheRecord>,
}

impl Collections {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply an operation to update the collections
    pub fn apply(&mut self, op: &Operation) {
        match op {
            Operation::EntryPut { entry } => {
                self.entries.insert(entry.id.clone(), entry.clone());
            }

            Operation::EntryDelete { id } => {
                self.entries.remove(id);
            }

            Operation::PayloadsCleared { ids } => {
                for id in ids {
                    if let Some(entry) = self.entries.get_mut(id) {
                        entry.image_payload = None;
                    }
                }
            }

            Operation::CachePut { record } => {
                self.cache.insert(record.key.clone(), record.clone());
            }

            Operation::CacheDelete { keys } => {
                for key in keys {
                    self.cache.remove(key);
                }
            }
        }
    }

    pub fn apply_all(&mut self, ops: &[Operation]) {
        for op in ops {
            self.apply(op);
        }
    }

    /// All entries, newest first (ties broken by id for a stable order)
    pub fn entries_newest_first(&self) -> Vec<Entry> {
        let mut entries: Vec<Entry> = self.entries.values().cloned().collect();
        entries.sort_by(|a, b| b.timestamp.cmp(&a.timestamp).then_with(|| a.id.cmp(&b.id)));
        entries
    }

    /// All cache records, ordered by key
    pub fn cache_records(&self) -> Vec<CacheRecord> {
        let mut records: Vec<CacheRecord> = self.cache.values().cloned().collect();
        records.sort_by(|a, b| a.key.cmp(&b.key));
        records
    }

    /// Operations that rebuild these collections from nothing
    pub fn to_operations(&self) -> Vec<Operation> {
        let entries = self
            .entries_newest_first()
            .into_iter()
            .map(|entry| Operation::EntryPut { entry });
        let cache = self
            .cache_records()
            .into_iter()
            .map(|record| Operation::CachePut { record });
        entries.chain(cache).collect()
    }
}

#[cfg(test)]
#[path = "state_tests.rs"]
mod tests;
