// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Single-writer flag shared by every mutating operation

use crate::error::StoreError;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// In-process exclusive write flag.
///
/// Acquisition never waits: a held flag rejects the caller immediately.
#[derive(Clone, Debug, Default)]
pub struct WriterFlag {
    held: Arc<AtomicBool>,
}

impl WriterFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn try_acquire(&self, operation: &'static str) -> Result<WriteGuard, StoreError> {
        if self
            .held
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            tracing::debug!(operation, "write rejected, flag held");
            return Err(StoreError::ConcurrencyRejected { operation });
        }
        Ok(WriteGuard {
            held: Arc::clone(&self.held),
        })
    }

    pub fn is_held(&self) -> bool {
        self.held.load(Ordering::Acquire)
    }
}

/// Releases the writer flag when dropped, including during unwinding
#[derive(Debug)]
pub struct WriteGuard {
    held: Arc<AtomicBool>,
}

impl Drop for WriteGuard {
    fn drop(&mut self) {
        self.held.store(false, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_acquire_is_rejected_until_release() {
        let flag = WriterFlag::new();

        let guard = flag.try_acquire("add").unwrap();
        assert!(flag.is_held());
        assert!(matches!(
            flag.try_acquire("delete"),
            Err(StoreError::ConcurrencyRejected {
                operation: "delete"
            })
        ));

        drop(guard);
        assert!(!flag.is_held());
        assert!(flag.try_acquire("delete").is_ok());
    }

    #[test]
    fn clones_share_the_flag() {
        let flag = WriterFlag::new();
        let other = flag.clone();

        let _guard = flag.try_acquire("add").unwrap();
        assert!(other.try_acquire("sweep").is_err());
    }

    #[test]
    fn flag_is_released_on_panic() {
        let flag = WriterFlag::new();
        let inner = flag.clone();

        let result = std::panic::catch_unwind(move || {
            let _guard = inner.try_acquire("add").unwrap();
            panic!("boom");
        });

        assert!(result.is_err());
        assert!(!flag.is_held());
    }
}
