// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Entry id generation

use crate::entry::EntryId;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Source of fresh entry ids
pub trait IdGen: Send + Sync {
    fn next_id(&self) -> EntryId;
}

/// Random v4 UUIDs, used in production
#[derive(Clone, Copy, Debug, Default)]
pub struct UuidIdGen;

impl IdGen for UuidIdGen {
    fn next_id(&self) -> EntryId {
        EntryId::new(uuid::Uuid::new_v4().to_string())
    }
}

/// Predictable `prefix-N` ids for tests. Clones share one counter.
#[derive(Clone, Debug)]
pub struct SequentialIdGen {
    prefix: String,
    counter: Arc<AtomicU64>,
}

impl SequentialIdGen {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self::starting_at(prefix, 1)
    }

    /// Continue numbering from `first`, e.g. after reopening a store
    pub fn starting_at(prefix: impl Into<String>, first: u64) -> Self {
        Self {
            prefix: prefix.into(),
            counter: Arc::new(AtomicU64::new(first)),
        }
    }
}

impl Default for SequentialIdGen {
    fn default() -> Self {
        Self::new("entry")
    }
}

impl IdGen for SequentialIdGen {
    fn next_id(&self) -> EntryId {
        let n = self.counter.fetch_add(1, Ordering::SeqCst);
        EntryId::new(format!("{}-{n}", self.prefix))
    }
}
