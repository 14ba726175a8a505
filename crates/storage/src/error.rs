// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Storage errors and their retry classification

use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("corrupted WAL entry at line {line}: {reason}")]
    Corrupted { line: u64, reason: String },
    #[error("checksum mismatch at line {line}")]
    ChecksumMismatch { line: u64 },
}

impl StorageError {
    /// Whether repeating the same write could succeed.
    ///
    /// Serialization failures, corruption and permission problems are
    /// permanent; other I/O failures are treated as transient.
    pub fn is_transient(&self) -> bool {
        match self {
            StorageError::Io(e) => !matches!(
                e.kind(),
                io::ErrorKind::PermissionDenied
                    | io::ErrorKind::InvalidData
                    | io::ErrorKind::InvalidInput
                    | io::ErrorKind::Unsupported
            ),
            StorageError::Json(_)
            | StorageError::Corrupted { .. }
            | StorageError::ChecksumMismatch { .. } => false,
        }
    }
}
