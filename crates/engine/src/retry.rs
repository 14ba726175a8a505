// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Bounded retry of persistence writes

use crate::error::StoreError;
use nl_core::RetryConfig;
use nl_storage::StorageError;

/// Run `write` until it succeeds, fails permanently, or the attempt budget
/// is spent. The delay before attempt `n` is `base_delay * (n - 1)`.
pub(crate) async fn with_retry<F>(
    policy: &RetryConfig,
    operation: &'static str,
    mut write: F,
) -> Result<u32, StoreError>
where
    F: FnMut() -> Result<(), StorageError>,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut attempt = 1;

    loop {
        if attempt > 1 {
            tokio::time::sleep(policy.delay_before(attempt)).await;
        }

        let err = match write() {
            Ok(()) => return Ok(attempt),
            Err(e) => e,
        };

        if !err.is_transient() {
            tracing::error!(operation, attempt, error = %err, "permanent write failure");
            return Err(StoreError::Persistence {
                attempts: attempt,
                source: err,
            });
        }
        if attempt >= max_attempts {
            tracing::error!(operation, attempts = attempt, error = %err, "write retries exhausted");
            return Err(StoreError::Persistence {
                attempts: attempt,
                source: err,
            });
        }

        tracing::warn!(
            operation,
            attempt,
            next_delay_ms = policy.delay_before(attempt + 1).as_millis() as u64,
            error = %err,
            "write failed, retrying"
        );
        attempt += 1;
    }
}

#[cfg(test)]
#[path = "retry_tests.rs"]
mod tests;
