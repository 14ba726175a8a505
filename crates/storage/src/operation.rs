// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Operations recorded in the write-ahead log
//!
//! Operations are idempotent: replaying a batch twice yields the same
//! collections as replaying it once.

use nl_core::{CacheRecord, Entry, EntryId};
use serde::{Deserialize, Serialize};

/// A single state change to the persistent collections
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Operation {
    /// Insert or replace an entry
    EntryPut { entry: Entry },
    /// Remove an entry
    EntryDelete { id: EntryId },
    /// Drop the photo payload of each listed entry, keeping the records
    PayloadsCleared { ids: Vec<EntryId> },
    /// Insert or replace a cache record
    CachePut { record: CacheRecord },
    /// Remove cache records by key
    CacheDelete { keys: Vec<String> },
}

impl Operation {
    /// Short name for logging
    pub fn kind(&self) -> &'static str {
        match self {
            Operation::EntryPut { .. } => "entry_put",
            Operation::EntryDelete { .. } => "entry_delete",
            Operation::PayloadsCleared { .. } => "payloads_cleared",
            Operation::CachePut { .. } => "cache_put",
            Operation::CacheDelete { .. } => "cache_delete",
        }
    }
}
