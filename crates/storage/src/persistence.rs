// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Persistence backend abstraction

use crate::error::StorageError;
use crate::operation::Operation;
use crate::state::Collections;
use nl_core::{CacheRecord, Entry, EntryId};

/// Durable home of the entry and cache collections.
///
/// `commit` applies a batch atomically: either every operation is durable
/// and visible to subsequent reads, or none is.
pub trait Persistence: Send + 'static {
    /// Run a read against the current collections
    fn read<R>(&self, f: impl FnOnce(&Collections) -> R) -> Result<R, StorageError>;

    /// Durably apply a batch of operations
    fn commit(&mut self, operations: Vec<Operation>) -> Result<(), StorageError>;

    /// All entries, newest first
    fn entries(&self) -> Result<Vec<Entry>, StorageError> {
        self.read(Collections::entries_newest_first)
    }

    fn entry(&self, id: &EntryId) -> Result<Option<Entry>, StorageError> {
        self.read(|c| c.entries.get(id).cloned())
    }

    fn cache_records(&self) -> Result<Vec<CacheRecord>, StorageError> {
        self.read(Collections::cache_records)
    }

    fn cache_record(&self, key: &str) -> Result<Option<CacheRecord>, StorageError> {
        self.read(|c| c.cache.get(key).cloned())
    }
}

/// Volatile backend, for embedding without a data directory
#[derive(Debug, Default)]
pub struct MemoryPersistence {
    collections: Collections,
    batches: u64,
}

impl MemoryPersistence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from existing collections
    pub fn with_collections(collections: Collections) -> Self {
        Self {
            collections,
            batches: 0,
        }
    }

    /// Number of batches committed since creation
    pub fn batches(&self) -> u64 {
        self.batches
    }
}

impl Persistence for MemoryPersistence {
    fn read<R>(&self, f: impl FnOnce(&Collections) -> R) -> Result<R, StorageError> {
        Ok(f(&self.collections))
    }

    fn commit(&mut self, operations: Vec<Operation>) -> Result<(), StorageError> {
        self.collections.apply_all(&operations);
        self.batches += 1;
        Ok(())
    }
}
