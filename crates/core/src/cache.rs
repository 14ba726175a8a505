// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Cached results of external nutrition lookups

use crate::payload::Payload;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// A cached lookup result with a fixed retention horizon
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheRecord {
    /// Lookup identifier (barcode or query hash)
    pub key: String,
    pub payload: Payload,
    pub created_at: DateTime<Utc>,
    #[serde(with = "humantime_serde")]
    pub ttl: Duration,
}

impl CacheRecord {
    pub fn new(
        key: impl Into<String>,
        payload: impl Into<Payload>,
        created_at: DateTime<Utc>,
        ttl: Duration,
    ) -> Self {
        Self {
            key: key.into(),
            payload: payload.into(),
            created_at,
            ttl,
        }
    }

    /// Time elapsed since insertion; zero if the clock is behind `created_at`
    pub fn age(&self, now: DateTime<Utc>) -> Duration {
        (now - self.created_at).to_std().unwrap_or(Duration::ZERO)
    }

    /// Expired once strictly more than `ttl` has elapsed.
    ///
    /// A record whose age equals its ttl is still live.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.age(now) > self.ttl
    }
}
