// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for the entry store

use nl_core::{EntryId, ValidationError};
use nl_storage::StorageError;
use thiserror::Error;

/// Errors surfaced by store operations
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),
    #[error("persistence failed after {attempts} attempt(s): {source}")]
    Persistence { attempts: u32, source: StorageError },
    #[error("{operation} rejected: another write is in flight")]
    ConcurrencyRejected { operation: &'static str },
    #[error("entry not found: {id}")]
    NotFound { id: EntryId },
}

impl StoreError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            StoreError::Validation(_) => ErrorKind::Validation,
            StoreError::Persistence { .. } => ErrorKind::Persistence,
            StoreError::ConcurrencyRejected { .. } => ErrorKind::ConcurrencyRejected,
            StoreError::NotFound { .. } => ErrorKind::NotFound,
        }
    }

    /// A failed read is reported as a single-attempt persistence failure
    pub(crate) fn read(source: StorageError) -> Self {
        StoreError::Persistence {
            attempts: 1,
            source,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    Persistence,
    ConcurrencyRejected,
    NotFound,
}

/// Cloneable record of the most recent failure, kept in the store's error slot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LastError {
    pub operation: &'static str,
    pub kind: ErrorKind,
    pub message: String,
}

impl LastError {
    pub fn new(operation: &'static str, error: &StoreError) -> Self {
        Self {
            operation,
            kind: error.kind(),
            message: error.to_string(),
        }
    }
}
