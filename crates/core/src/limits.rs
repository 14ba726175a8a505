// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Size and retention limits shared by the store, the compressor and the sweeper.

use std::time::Duration;

/// One mebibyte, the unit photo storage is reported in
pub const BYTES_PER_MB: u64 = 1_048_576;

/// Largest image payload persisted with an entry (5 MiB)
pub const MAX_PAYLOAD_BYTES: usize = 5 * BYTES_PER_MB as usize;

/// Photos older than this many days are reclaimed by the cleanup sweep
pub const DEFAULT_PHOTO_RETENTION_DAYS: u32 = 7;

/// Retention horizon for cached nutrition lookups
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(60 * 60);

/// Snapshot age after which an activation triggers a refetch
pub const DEFAULT_STALE_AFTER: Duration = Duration::from_secs(12 * 60 * 60);

/// Number of write attempts before a persistence failure is surfaced
pub const DEFAULT_WRITE_ATTEMPTS: u32 = 3;

/// Base delay of the linear write backoff
pub const DEFAULT_RETRY_BASE_DELAY: Duration = Duration::from_millis(100);

/// Convert a byte count to mebibytes
pub fn bytes_to_mb(bytes: u64) -> f64 {
    bytes as f64 / BYTES_PER_MB as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_cap_is_five_mebibytes() {
        assert_eq!(MAX_PAYLOAD_BYTES, 5_242_880);
    }

    #[test]
    fn bytes_to_mb_uses_binary_units() {
        assert_eq!(bytes_to_mb(BYTES_PER_MB), 1.0);
        assert_eq!(bytes_to_mb(BYTES_PER_MB / 2), 0.5);
        assert_eq!(bytes_to_mb(0), 0.0);
    }
}
