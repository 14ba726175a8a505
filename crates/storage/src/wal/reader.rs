// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Sequential reads over `wal.jsonl`.
//!
//! The first line that fails to parse or verify ends the trusted prefix.
//! The iterator yields that error once and then stops.

use super::entry::WalEntry;
use crate::error::StorageError;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};

pub struct WalReader {
    path: PathBuf,
}

impl WalReader {
    /// A missing file reads as an empty log
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
        }
    }

    pub fn entries(&self) -> Result<WalEntryIter, StorageError> {
        let source = match File::open(&self.path) {
            Ok(file) => Some(BufReader::new(file)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => None,
            Err(e) => return Err(e.into()),
        };
        Ok(WalEntryIter {
            source,
            line_number: 0,
            offset: 0,
            last_valid_position: 0,
        })
    }

    /// Walk the whole log and measure its trusted prefix
    pub fn validate(&self) -> Result<WalValidation, StorageError> {
        let mut iter = self.entries()?;
        let mut report = WalValidation::default();

        while let Some(result) = iter.next() {
            match result {
                Ok(entry) => {
                    report.valid_entries += 1;
                    report.last_valid_sequence = Some(entry.sequence);
                }
                Err(e) => {
                    report.corruption = Some(WalCorruption {
                        line: iter.line_number(),
                        reason: e.to_string(),
                    });
                }
            }
        }

        report.valid_bytes = iter.last_valid_position();
        Ok(report)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Yields verified entries in file order
pub struct WalEntryIter {
    source: Option<BufReader<File>>,
    line_number: u64,
    offset: u64,
    last_valid_position: u64,
}

impl WalEntryIter {
    /// Byte offset just past the last entry that verified
    pub fn last_valid_position(&self) -> u64 {
        self.last_valid_position
    }

    pub fn line_number(&self) -> u64 {
        self.line_number
    }

    fn read_entry(
        &mut self,
        source: &mut BufReader<File>,
    ) -> Option<Result<WalEntry, StorageError>> {
        let mut buf = Vec::new();
        loop {
            buf.clear();
            let read = match source.read_until(b'\n', &mut buf) {
                Ok(0) => return None,
                Ok(n) => n as u64,
                Err(e) => return Some(Err(e.into())),
            };
            self.line_number += 1;
            self.offset += read;

            if buf.iter().all(u8::is_ascii_whitespace) {
                continue;
            }
            let line = self.line_number;
            if buf.last() != Some(&b'\n') {
                return Some(Err(StorageError::Corrupted {
                    line,
                    reason: "truncated entry".to_string(),
                }));
            }
            let Ok(text) = std::str::from_utf8(&buf) else {
                return Some(Err(StorageError::Corrupted {
                    line,
                    reason: "invalid utf-8".to_string(),
                }));
            };
            return Some(WalEntry::decode(text, line));
        }
    }
}

impl Iterator for WalEntryIter {
    type Item = Result<WalEntry, StorageError>;

    fn next(&mut self) -> Option<Self::Item> {
        // Taken out while reading; only put back after a good entry
        let mut source = self.source.take()?;
        let result = self.read_entry(&mut source)?;
        if result.is_ok() {
            self.last_valid_position = self.offset;
            self.source = Some(source);
        }
        Some(result)
    }
}

/// How much of a log can be trusted
#[derive(Debug, Default)]
pub struct WalValidation {
    pub valid_entries: u64,
    pub last_valid_sequence: Option<u64>,
    /// Length of the trusted prefix in bytes
    pub valid_bytes: u64,
    pub corruption: Option<WalCorruption>,
}

#[derive(Debug)]
pub struct WalCorruption {
    pub line: u64,
    pub reason: String,
}

#[cfg(test)]
#[path = "reader_tests.rs"]
mod tests;
