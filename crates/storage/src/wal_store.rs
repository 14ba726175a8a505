// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! WAL-backed persistence with crash recovery and compaction

use crate::error::StorageError;
use crate::operation::Operation;
use crate::persistence::Persistence;
use crate::state::Collections;
use crate::wal::{WalEntry, WalReader, WalWriter};
use chrono::Utc;
use std::io::Write;
use std::path::{Path, PathBuf};

const WAL_FILE: &str = "wal.jsonl";

/// Configuration for WalPersistence
#[derive(Debug, Clone)]
pub struct WalConfig {
    /// Number of committed batches after which the log is compacted
    pub compaction_threshold: u64,
    /// Machine ID stamped on WAL entries
    pub machine_id: String,
}

impl Default for WalConfig {
    fn default() -> Self {
        Self {
            compaction_threshold: 1_000,
            machine_id: uuid::Uuid::new_v4().to_string(),
        }
    }
}

impl WalConfig {
    pub fn with_compaction_threshold(mut self, batches: u64) -> Self {
        self.compaction_threshold = batches;
        self
    }
}

/// Result of a compaction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompactionResult {
    /// Batches folded into the compacted log
    pub batches_folded: u64,
    pub bytes_reclaimed: u64,
}

/// Persistence over an append-only log in a data directory
pub struct WalPersistence {
    config: WalConfig,
    base_dir: PathBuf,
    wal_path: PathBuf,
    writer: WalWriter,
    state: Collections,
    batches_since_compaction: u64,
    /// Line of the first corrupt entry found at open; commits are refused
    /// until the tail is repaired, since appends after it would not replay
    corrupt_line: Option<u64>,
}

impl WalPersistence {
    /// Open or create a store at the given directory, replaying the log.
    ///
    /// Replay stops at the first corrupt entry. The log is not truncated
    /// here, and commits fail with [`StorageError::Corrupted`] until
    /// [`WalPersistence::repair_log`] (or [`WalPersistence::repair`] before
    /// reopening) cuts the tail.
    pub fn open(base_dir: &Path, config: WalConfig) -> Result<Self, StorageError> {
        std::fs::create_dir_all(base_dir)?;
        let wal_path = base_dir.join(WAL_FILE);

        let mut state = Collections::new();
        let mut replayed = 0u64;
        let mut corrupt_line = None;
        let mut iter = WalReader::new(&wal_path).entries()?;
        while let Some(result) = iter.next() {
            match result {
                Ok(entry) => {
                    state.apply_all(&entry.operations);
                    replayed += 1;
                }
                Err(e) => {
                    corrupt_line = Some(iter.line_number());
                    tracing::warn!(error = %e, "stopping WAL replay due to read error");
                    tracing::warn!(
                        last_valid_position = iter.last_valid_position(),
                        "WAL corruption detected but not auto-truncated; call repair() for recovery"
                    );
                    break;
                }
            }
        }

        let writer = WalWriter::open(&wal_path, &config.machine_id)?;
        tracing::info!(
            path = %wal_path.display(),
            batches = replayed,
            entries = state.entries.len(),
            cache_records = state.cache.len(),
            "opened entry store"
        );

        Ok(Self {
            config,
            base_dir: base_dir.to_path_buf(),
            wal_path,
            writer,
            state,
            batches_since_compaction: replayed,
            corrupt_line,
        })
    }

    pub fn open_default(base_dir: &Path) -> Result<Self, StorageError> {
        Self::open(base_dir, WalConfig::default())
    }

    /// Truncate the log at its first corrupt entry.
    ///
    /// Returns the number of bytes removed, or 0 if the log was clean.
    pub fn repair(base_dir: &Path) -> Result<u64, StorageError> {
        let wal_path = base_dir.join(WAL_FILE);
        if !wal_path.exists() {
            return Ok(0);
        }

        let validation = WalReader::new(&wal_path).validate()?;
        let Some(corruption) = validation.corruption else {
            return Ok(0);
        };

        let old_size = std::fs::metadata(&wal_path)?.len();
        let file = std::fs::OpenOptions::new().write(true).open(&wal_path)?;
        file.set_len(validation.valid_bytes)?;
        file.sync_all()?;

        let removed = old_size.saturating_sub(validation.valid_bytes);
        tracing::info!(
            line = corruption.line,
            reason = %corruption.reason,
            bytes_removed = removed,
            "WAL truncated at corruption point"
        );
        Ok(removed)
    }

    /// Truncate this store's log at its corrupt tail and resume writing.
    ///
    /// The replayed collections already end at the cut, so they are kept.
    pub fn repair_log(&mut self) -> Result<u64, StorageError> {
        let removed = Self::repair(&self.base_dir)?;
        self.writer = WalWriter::open(&self.wal_path, &self.config.machine_id)?;
        self.corrupt_line = None;
        Ok(removed)
    }

    /// Whether commits are refused because of an unrepaired corrupt tail
    pub fn is_corrupt(&self) -> bool {
        self.corrupt_line.is_some()
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Next sequence number to be written
    pub fn sequence(&self) -> u64 {
        self.writer.sequence()
    }

    /// Size of the log on disk
    pub fn wal_len(&self) -> u64 {
        self.writer.len()
    }

    pub fn should_compact(&self) -> bool {
        self.config.compaction_threshold > 0
            && self.batches_since_compaction >= self.config.compaction_threshold
    }

    /// Rewrite the log as a single batch holding the current collections.
    ///
    /// The new log is written to a temporary file and renamed over the old
    /// one, so a crash leaves either the old or the new log intact.
    pub fn compact(&mut self) -> Result<CompactionResult, StorageError> {
        let old_size = self.writer.len();
        let temp_path = self.wal_path.with_extension("jsonl.compact.tmp");

        {
            let mut file = std::fs::File::create(&temp_path)?;
            let operations = self.state.to_operations();
            if !operations.is_empty() {
                let entry = WalEntry::new(
                    self.writer.sequence(),
                    now_micros(),
                    &self.config.machine_id,
                    operations,
                )?;
                file.write_all(entry.to_line()?.as_bytes())?;
                file.write_all(b"\n")?;
            }
            file.sync_all()?;
        }

        std::fs::rename(&temp_path, &self.wal_path)?;
        self.writer = WalWriter::open(&self.wal_path, &self.config.machine_id)?;

        let result = CompactionResult {
            batches_folded: self.batches_since_compaction,
            bytes_reclaimed: old_size.saturating_sub(self.writer.len()),
        };
        self.batches_since_compaction = 0;
        // The rewritten log holds only replayed state
        self.corrupt_line = None;

        tracing::info!(
            batches_folded = result.batches_folded,
            bytes_reclaimed = result.bytes_reclaimed,
            "WAL compacted"
        );
        Ok(result)
    }
}

impl Persistence for WalPersistence {
    fn read<R>(&self, f: impl FnOnce(&Collections) -> R) -> Result<R, StorageError> {
        Ok(f(&self.state))
    }

    fn commit(&mut self, operations: Vec<Operation>) -> Result<(), StorageError> {
        if let Some(line) = self.corrupt_line {
            return Err(StorageError::Corrupted {
                line,
                reason: "log has an unrepaired corrupt tail".to_string(),
            });
        }
        let sequence = self.writer.append(operations.clone(), now_micros())?;
        self.state.apply_all(&operations);
        self.batches_since_compaction += 1;
        tracing::debug!(sequence, operations = operations.len(), "batch committed");

        // The batch is already durable; a failed compaction only leaves a longer log
        if self.should_compact() {
            if let Err(e) = self.compact() {
                tracing::warn!(error = %e, "WAL compaction failed");
            }
        }
        Ok(())
    }
}

fn now_micros() -> u64 {
    u64::try_from(Utc::now().timestamp_micros()).unwrap_or(0)
}

#[cfg(test)]
#[path = "wal_store_tests.rs"]
mod tests;
