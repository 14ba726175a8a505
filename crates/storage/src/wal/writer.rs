// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Durable appends to `wal.jsonl`

use super::entry::WalEntry;
use super::reader::WalReader;
use crate::error::StorageError;
use crate::operation::Operation;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Appends one fsync'd line per batch.
///
/// `len` tracks the file size after the last successful append. A failed
/// append cuts the file back to it, so later batches never follow a torn
/// line.
pub struct WalWriter {
    file: File,
    path: PathBuf,
    machine_id: String,
    next_sequence: u64,
    len: u64,
}

impl WalWriter {
    /// Open for appending, creating the file and its parent directories.
    ///
    /// Numbering resumes after the last entry that verifies.
    pub fn open(path: &Path, machine_id: &str) -> Result<Self, StorageError> {
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)?;
        }
        let next_sequence = WalReader::new(path)
            .validate()?
            .last_valid_sequence
            .map_or(0, |last| last + 1);

        let file = OpenOptions::new().create(true).append(true).open(path)?;
        let len = file.metadata()?.len();

        Ok(Self {
            file,
            path: path.to_path_buf(),
            machine_id: machine_id.to_owned(),
            next_sequence,
            len,
        })
    }

    /// Write `operations` as the next entry; returns its sequence number
    pub fn append(
        &mut self,
        operations: Vec<Operation>,
        timestamp_micros: u64,
    ) -> Result<u64, StorageError> {
        let sequence = self.next_sequence;
        let mut bytes = WalEntry::new(sequence, timestamp_micros, &self.machine_id, operations)?
            .to_line()?
            .into_bytes();
        bytes.push(b'\n');

        let written = self
            .file
            .write_all(&bytes)
            .and_then(|()| self.file.sync_all());
        if let Err(e) = written {
            if let Err(rollback) = self.file.set_len(self.len) {
                tracing::error!(error = %rollback, len = self.len, "could not cut back torn WAL line");
            }
            return Err(e.into());
        }

        self.len += bytes.len() as u64;
        self.next_sequence += 1;
        Ok(sequence)
    }

    /// Sequence number the next append will get
    pub fn sequence(&self) -> u64 {
        self.next_sequence
    }

    pub fn len(&self) -> u64 {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn machine_id(&self) -> &str {
        &self.machine_id
    }
}

#[cfg(test)]
#[path = "writer_tests.rs"]
mod tests;
