// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Entry store: the single owner of the entry and cache collections
//!
//! Mutations take the writer flag, persist through the retry policy, then
//! update the in-memory snapshot and publish a [`StoreEvent`]. Reads are
//! served from the snapshot without touching persistence.

use crate::compress::{JpegEncoder, PayloadCompressor, PayloadEncoder};
use crate::error::{LastError, StoreError};
use crate::guard::WriterFlag;
use crate::retry::with_retry;
use chrono::{DateTime, NaiveDate, Utc};
use nl_adapters::{NoOpWellnessSync, TracedWellnessSync, WellnessSync};
use nl_core::limits::bytes_to_mb;
use nl_core::{
    Calendar, Clock, Entry, EntryDraft, EntryId, EventBus, EventPattern, EventReceiver, IdGen,
    Macros, Payload, StoreConfig, StoreEvent, Subscription, SystemClock, UuidIdGen,
};
use nl_storage::{Operation, Persistence, StorageError};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Result of a photo cleanup pass
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhotoCleanup {
    pub count: usize,
    pub space_reclaimed_mb: f64,
}

impl PhotoCleanup {
    pub const NONE: PhotoCleanup = PhotoCleanup {
        count: 0,
        space_reclaimed_mb: 0.0,
    };
}

pub struct EntryStore<P: Persistence, C: Clock = SystemClock> {
    persistence: Mutex<P>,
    snapshot: RwLock<Vec<Entry>>,
    last_fetch: Mutex<Option<DateTime<Utc>>>,
    last_error: Mutex<Option<LastError>>,
    writer: WriterFlag,
    config: StoreConfig,
    calendar: Calendar,
    clock: C,
    ids: Box<dyn IdGen>,
    sync: Arc<dyn WellnessSync>,
    compressor: PayloadCompressor,
    events: EventBus,
    next_subscriber: AtomicU64,
}

impl<P: Persistence> EntryStore<P, SystemClock> {
    pub fn new(persistence: P, config: StoreConfig) -> Self {
        Self::with_clock(persistence, config, SystemClock)
    }
}

impl<P: Persistence, C: Clock> EntryStore<P, C> {
    /// Create a store reading time from `clock`.
    ///
    /// The snapshot starts empty; call [`EntryStore::fetch_all`] or
    /// [`EntryStore::refresh_if_stale`] to load it.
    pub fn with_clock(persistence: P, config: StoreConfig, clock: C) -> Self {
        let calendar = config.calendar();
        let compressor = PayloadCompressor::new(JpegEncoder, config.max_payload_bytes);
        Self {
            persistence: Mutex::new(persistence),
            snapshot: RwLock::new(Vec::new()),
            last_fetch: Mutex::new(None),
            last_error: Mutex::new(None),
            writer: WriterFlag::new(),
            config,
            calendar,
            clock,
            ids: Box::new(UuidIdGen),
            sync: Arc::new(TracedWellnessSync::new(NoOpWellnessSync)),
            compressor,
            events: EventBus::new(),
            next_subscriber: AtomicU64::new(1),
        }
    }

    pub fn with_id_gen(mut self, ids: impl IdGen + 'static) -> Self {
        self.ids = Box::new(ids);
        self
    }

    /// Export committed entries to `sync` after each add
    pub fn with_sync(mut self, sync: impl WellnessSync) -> Self {
        self.sync = Arc::new(TracedWellnessSync::new(sync));
        self
    }

    pub fn with_encoder(mut self, encoder: impl PayloadEncoder) -> Self {
        self.compressor = PayloadCompressor::new(encoder, self.config.max_payload_bytes);
        self
    }

    // ---------------------------------------------------------------------
    // Mutations
    // ---------------------------------------------------------------------

    /// Reload the snapshot from persistence, newest first
    pub async fn fetch_all(&self) -> Result<Vec<Entry>, StoreError> {
        let result = self.reload_snapshot();
        if let Ok(entries) = &result {
            *self.lock_last_fetch() = Some(self.clock.now());
            tracing::debug!(count = entries.len(), "snapshot reloaded");
            self.events.publish(StoreEvent::EntriesReloaded {
                count: entries.len(),
            });
        }
        self.record_outcome("fetch_all", result)
    }

    /// Validate and persist a new entry
    pub async fn add(&self, draft: EntryDraft) -> Result<Entry, StoreError> {
        let result = self.add_inner(draft).await;
        self.record_outcome("add", result)
    }

    async fn add_inner(&self, mut draft: EntryDraft) -> Result<Entry, StoreError> {
        let _guard = self.writer.try_acquire("add")?;
        draft.validate()?;

        if let Some(payload) = draft.image_payload.take() {
            draft.image_payload = Some(self.shrink(payload).await);
        }
        let entry = draft.into_entry(self.ids.next_id(), self.clock.now());

        self.commit(
            "add",
            vec![Operation::EntryPut {
                entry: entry.clone(),
            }],
        )
        .await?;

        {
            // A concurrent fetch may already have loaded the committed entry
            let mut snapshot = self.write_snapshot();
            if !snapshot.iter().any(|e| e.id == entry.id) {
                snapshot.insert(0, entry.clone());
            }
        }
        tracing::info!(id = %entry.id, food_name = %entry.food_name, "entry added");
        self.events.publish(StoreEvent::EntryAdded {
            entry: entry.clone(),
        });
        self.spawn_sync(entry.clone());

        Ok(entry)
    }

    /// Rewrite an existing entry; its stored id and timestamp are kept
    pub async fn update(&self, entry: Entry) -> Result<Entry, StoreError> {
        let result = self.update_inner(entry).await;
        self.record_outcome("update", result)
    }

    async fn update_inner(&self, mut entry: Entry) -> Result<Entry, StoreError> {
        let _guard = self.writer.try_acquire("update")?;
        entry.validate()?;

        let stored = self
            .read_persistence(|p| p.entry(&entry.id))?
            .ok_or_else(|| StoreError::NotFound {
                id: entry.id.clone(),
            })?;
        entry.timestamp = stored.timestamp;
        if let Some(payload) = entry.image_payload.take() {
            entry.image_payload = Some(self.shrink(payload).await);
        }

        self.commit(
            "update",
            vec![Operation::EntryPut {
                entry: entry.clone(),
            }],
        )
        .await?;

        // The write is durable; a failed reload only leaves the snapshot patched in place
        if let Err(e) = self.reload_snapshot() {
            tracing::warn!(error = %e, "snapshot reload after update failed");
            let mut snapshot = self.write_snapshot();
            if let Some(slot) = snapshot.iter_mut().find(|stale| stale.id == entry.id) {
                *slot = entry.clone();
            }
        }

        tracing::info!(id = %entry.id, "entry updated");
        self.events.publish(StoreEvent::EntryUpdated {
            entry: entry.clone(),
        });
        Ok(entry)
    }

    pub async fn delete(&self, id: &EntryId) -> Result<(), StoreError> {
        let result = self.delete_inner(id).await;
        self.record_outcome("delete", result)
    }

    async fn delete_inner(&self, id: &EntryId) -> Result<(), StoreError> {
        let _guard = self.writer.try_acquire("delete")?;

        if self.read_persistence(|p| p.entry(id))?.is_none() {
            return Err(StoreError::NotFound { id: id.clone() });
        }

        self.commit("delete", vec![Operation::EntryDelete { id: id.clone() }])
            .await?;

        self.write_snapshot().retain(|e| &e.id != id);
        tracing::info!(%id, "entry deleted");
        self.events
            .publish(StoreEvent::EntryDeleted { id: id.clone() });
        Ok(())
    }

    /// Drop the photos of entries older than `older_than_days`, in one batch
    pub async fn cleanup_old_photos(&self, older_than_days: u32) -> Result<PhotoCleanup, StoreError> {
        let result = self.cleanup_inner(older_than_days).await;
        self.record_outcome("cleanup_old_photos", result)
    }

    async fn cleanup_inner(&self, older_than_days: u32) -> Result<PhotoCleanup, StoreError> {
        let _guard = self.writer.try_acquire("cleanup_old_photos")?;

        let Some(cutoff) = chrono::Duration::try_days(i64::from(older_than_days))
            .and_then(|age| self.clock.now().checked_sub_signed(age))
        else {
            tracing::debug!(older_than_days, "retention window predates any timestamp");
            return Ok(PhotoCleanup::NONE);
        };
        let stale: Vec<(EntryId, u64)> = self.read_persistence(|p| {
            p.read(|c| {
                c.entries
                    .values()
                    .filter(|e| e.timestamp < cutoff && e.has_photo())
                    .map(|e| (e.id.clone(), e.photo_bytes()))
                    .collect()
            })
        })?;

        if stale.is_empty() {
            tracing::debug!(older_than_days, "no photos to clean up");
            return Ok(PhotoCleanup::NONE);
        }

        let bytes: u64 = stale.iter().map(|(_, b)| b).sum();
        let ids: Vec<EntryId> = stale.into_iter().map(|(id, _)| id).collect();
        self.commit(
            "cleanup_old_photos",
            vec![Operation::PayloadsCleared { ids: ids.clone() }],
        )
        .await?;

        {
            let mut snapshot = self.write_snapshot();
            for entry in snapshot.iter_mut().filter(|e| ids.contains(&e.id)) {
                entry.image_payload = None;
            }
        }

        let cleanup = PhotoCleanup {
            count: ids.len(),
            space_reclaimed_mb: bytes_to_mb(bytes),
        };
        tracing::info!(
            count = cleanup.count,
            space_reclaimed_mb = cleanup.space_reclaimed_mb,
            "old photos cleaned up"
        );
        self.events.publish(StoreEvent::PhotosCleaned {
            count: cleanup.count,
            bytes_reclaimed: bytes,
        });
        Ok(cleanup)
    }

    /// Refetch if never fetched, if the snapshot is older than the
    /// configured staleness window, or if the calendar day has changed.
    pub async fn refresh_if_stale(&self) -> Result<bool, StoreError> {
        let now = self.clock.now();
        let last = *self.lock_last_fetch();

        let stale = match last {
            None => true,
            Some(fetched) => {
                let too_old = (now - fetched)
                    .to_std()
                    .map(|age| age > self.config.stale_after)
                    .unwrap_or(false);
                too_old || !self.calendar.same_day(fetched, now)
            }
        };

        if !stale {
            return Ok(false);
        }
        tracing::debug!(last_fetch = ?last, "snapshot stale, refetching");
        self.fetch_all().await?;
        Ok(true)
    }

    // ---------------------------------------------------------------------
    // Snapshot reads
    // ---------------------------------------------------------------------

    /// Entries whose timestamp falls on `date` in the store's calendar
    pub fn entries_for_date(&self, date: NaiveDate) -> Vec<Entry> {
        let (start, end) = self.calendar.day_range(date);
        self.read_snapshot()
            .iter()
            .filter(|e| e.timestamp >= start && e.timestamp < end)
            .cloned()
            .collect()
    }

    pub fn todays_totals(&self) -> Macros {
        self.entries_for_date(self.today())
            .iter()
            .map(|e| &e.macros)
            .sum()
    }

    pub fn latest_entry(&self) -> Option<Entry> {
        self.read_snapshot()
            .iter()
            .max_by_key(|e| e.timestamp)
            .cloned()
    }

    pub fn total_entry_count(&self) -> usize {
        self.read_snapshot().len()
    }

    pub fn entries_with_photos(&self) -> Vec<Entry> {
        self.read_snapshot()
            .iter()
            .filter(|e| e.has_photo())
            .cloned()
            .collect()
    }

    /// Total photo payload size in mebibytes
    pub fn estimated_photo_storage_mb(&self) -> f64 {
        let bytes: u64 = self.read_snapshot().iter().map(Entry::photo_bytes).sum();
        bytes_to_mb(bytes)
    }

    /// Current calendar date in the store's offset
    pub fn today(&self) -> NaiveDate {
        self.calendar.date_of(self.clock.now())
    }

    // ---------------------------------------------------------------------
    // Error slot and notifications
    // ---------------------------------------------------------------------

    pub fn last_error(&self) -> Option<LastError> {
        self.last_error
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    pub fn clear_error(&self) {
        *self.last_error.lock().unwrap_or_else(|e| e.into_inner()) = None;
    }

    /// Receive events whose name matches `pattern` (e.g. `"entry:*"`)
    pub fn subscribe(&self, pattern: &str) -> EventReceiver {
        let n = self.next_subscriber.fetch_add(1, Ordering::Relaxed);
        self.events.subscribe(Subscription::new(
            format!("subscriber-{n}"),
            vec![EventPattern::new(pattern)],
            pattern,
        ))
    }

    pub fn events(&self) -> &EventBus {
        &self.events
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    // ---------------------------------------------------------------------
    // Crate-internal plumbing shared with the sweeper and the lookup cache
    // ---------------------------------------------------------------------

    pub(crate) fn writer(&self) -> &WriterFlag {
        &self.writer
    }

    pub(crate) fn clock(&self) -> &C {
        &self.clock
    }

    /// Commit a batch under the retry policy
    pub(crate) async fn commit(
        &self,
        operation: &'static str,
        operations: Vec<Operation>,
    ) -> Result<(), StoreError> {
        let attempts = with_retry(&self.config.retry, operation, || {
            self.lock_persistence().commit(operations.clone())
        })
        .await?;
        tracing::debug!(operation, attempts, batch = operations.len(), "batch persisted");
        Ok(())
    }

    pub(crate) fn read_persistence<R>(
        &self,
        f: impl FnOnce(&P) -> Result<R, StorageError>,
    ) -> Result<R, StoreError> {
        f(&self.lock_persistence()).map_err(StoreError::read)
    }

    /// Mirror a failure into the error slot; successes leave it untouched
    pub(crate) fn record_outcome<T>(
        &self,
        operation: &'static str,
        result: Result<T, StoreError>,
    ) -> Result<T, StoreError> {
        if let Err(err) = &result {
            tracing::warn!(operation, error = %err, "store operation failed");
            *self.last_error.lock().unwrap_or_else(|e| e.into_inner()) =
                Some(LastError::new(operation, err));
        }
        result
    }

    /// Replace the snapshot with persisted entries.
    ///
    /// The write lock is held across the read so a mutation's own snapshot
    /// edit lands either wholly before or wholly after the reload.
    fn reload_snapshot(&self) -> Result<Vec<Entry>, StoreError> {
        let mut snapshot = self.write_snapshot();
        let entries = self.read_persistence(|p| p.entries())?;
        *snapshot = entries.clone();
        Ok(entries)
    }

    /// Re-encode an oversized payload on the blocking pool
    async fn shrink(&self, payload: Payload) -> Payload {
        if payload.len() <= self.compressor.max_bytes() {
            return payload;
        }
        let compressor = self.compressor.clone();
        let original = payload.clone();
        match tokio::task::spawn_blocking(move || compressor.compress(payload)).await {
            Ok(compressed) => compressed.payload,
            Err(e) => {
                tracing::warn!(error = %e, "compression task failed, storing payload as-is");
                original
            }
        }
    }

    fn spawn_sync(&self, entry: Entry) {
        let sync = Arc::clone(&self.sync);
        tokio::spawn(async move {
            // Failures are logged by the traced wrapper
            let _ = sync.record(&entry).await;
        });
    }

    fn lock_persistence(&self) -> MutexGuard<'_, P> {
        self.persistence.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn lock_last_fetch(&self) -> MutexGuard<'_, Option<DateTime<Utc>>> {
        self.last_fetch.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn read_snapshot(&self) -> RwLockReadGuard<'_, Vec<Entry>> {
        self.snapshot.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write_snapshot(&self) -> RwLockWriteGuard<'_, Vec<Entry>> {
        self.snapshot.write().unwrap_or_else(|e| e.into_inner())
    }
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
