// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! One log line: a checksummed batch of operations

use crate::error::StorageError;
use crate::operation::Operation;
use serde::{Deserialize, Serialize};

/// An atomic batch as it appears in `wal.jsonl`.
///
/// `checksum` is the CRC32 of the JSON-encoded `operations`, so a flipped
/// byte inside a payload is caught even when the line still parses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WalEntry {
    pub sequence: u64,
    /// Microseconds since the Unix epoch
    pub timestamp_micros: u64,
    pub machine_id: String,
    pub operations: Vec<Operation>,
    pub checksum: u32,
}

fn crc(operations: &[Operation]) -> Result<u32, StorageError> {
    let bytes = serde_json::to_vec(operations)?;
    Ok(crc32fast::hash(&bytes))
}

impl WalEntry {
    pub fn new(
        sequence: u64,
        timestamp_micros: u64,
        machine_id: &str,
        operations: Vec<Operation>,
    ) -> Result<Self, StorageError> {
        Ok(Self {
            checksum: crc(&operations)?,
            sequence,
            timestamp_micros,
            machine_id: machine_id.to_owned(),
            operations,
        })
    }

    pub fn verify(&self) -> bool {
        crc(&self.operations).is_ok_and(|sum| sum == self.checksum)
    }

    /// Single-line JSON without the trailing newline
    pub fn to_line(&self) -> Result<String, StorageError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_line(line: &str) -> Result<Self, StorageError> {
        Ok(serde_json::from_str(line.trim_end())?)
    }

    /// Parse and verify line `number` of a log
    pub(crate) fn decode(line: &str, number: u64) -> Result<Self, StorageError> {
        let entry = Self::from_line(line).map_err(|e| StorageError::Corrupted {
            line: number,
            reason: e.to_string(),
        })?;
        if entry.verify() {
            Ok(entry)
        } else {
            Err(StorageError::ChecksumMismatch { line: number })
        }
    }
}

#[cfg(test)]
#[path = "entry_tests.rs"]
mod tests;
