// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Change notifications emitted after committed mutations

use crate::entry::{Entry, EntryId};
use serde::{Deserialize, Serialize};

/// A committed change to the store's collections
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum StoreEvent {
    /// A new entry was committed and prepended to the snapshot
    EntryAdded { entry: Entry },

    /// An entry was rewritten; the snapshot was reloaded
    EntryUpdated { entry: Entry },

    /// An entry was removed
    EntryDeleted { id: EntryId },

    /// The snapshot was refreshed from persistent storage
    EntriesReloaded { count: usize },

    /// Old photo payloads were dropped
    PhotosCleaned { count: usize, bytes_reclaimed: u64 },

    /// A lookup result was cached
    CacheStored { key: String },

    /// Expired cache records were evicted
    CacheSwept { deleted: usize },
}

impl StoreEvent {
    /// Colon-separated name used for subscription matching
    pub fn name(&self) -> String {
        match self {
            StoreEvent::EntryAdded { .. } => "entry:added".to_string(),
            StoreEvent::EntryUpdated { .. } => "entry:updated".to_string(),
            StoreEvent::EntryDeleted { .. } => "entry:deleted".to_string(),
            StoreEvent::EntriesReloaded { .. } => "entry:reloaded".to_string(),
            StoreEvent::PhotosCleaned { .. } => "photos:cleaned".to_string(),
            StoreEvent::CacheStored { .. } => "cache:stored".to_string(),
            StoreEvent::CacheSwept { .. } => "cache:swept".to_string(),
        }
    }
}
