// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Store configuration
//!
//! Every field has a default, so an empty TOML document is a valid config:
//!
//! ```toml
//! max_payload_bytes = 5242880
//! photo_retention_days = 7
//! cache_ttl = "1h"
//! stale_after = "12h"
//! utc_offset_secs = 0
//!
//! [retry]
//! max_attempts = 3
//! base_delay = "100ms"
//! ```

use crate::calendar::Calendar;
use crate::limits;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("toml error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Write retry policy: linear backoff between a bounded number of attempts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    pub max_attempts: u32,
    #[serde(with = "humantime_serde")]
    pub base_delay: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: limits::DEFAULT_WRITE_ATTEMPTS,
            base_delay: limits::DEFAULT_RETRY_BASE_DELAY,
        }
    }
}

impl RetryConfig {
    /// Delay to wait before the given 1-based attempt
    pub fn delay_before(&self, attempt: u32) -> Duration {
        self.base_delay * attempt.saturating_sub(1)
    }

    pub fn with_max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = attempts;
        self
    }

    pub fn with_base_delay(mut self, delay: Duration) -> Self {
        self.base_delay = delay;
        self
    }
}

/// Configuration for the entry store and its sweeps
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Photos larger than this are recompressed on write
    pub max_payload_bytes: usize,
    /// Age in days after which photos are reclaimed
    pub photo_retention_days: u32,
    /// Retention horizon for cached lookups
    #[serde(with = "humantime_serde")]
    pub cache_ttl: Duration,
    /// Snapshot age that triggers a refetch on activation
    #[serde(with = "humantime_serde")]
    pub stale_after: Duration,
    /// Offset east of UTC used for calendar-day boundaries
    pub utc_offset_secs: i32,
    pub retry: RetryConfig,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            max_payload_bytes: limits::MAX_PAYLOAD_BYTES,
            photo_retention_days: limits::DEFAULT_PHOTO_RETENTION_DAYS,
            cache_ttl: limits::DEFAULT_CACHE_TTL,
            stale_after: limits::DEFAULT_STALE_AFTER,
            utc_offset_secs: 0,
            retry: RetryConfig::default(),
        }
    }
}

impl StoreConfig {
    /// Parse and validate a TOML document
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: StoreConfig = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a TOML file, falling back to defaults when it does not exist
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(source) => Self::from_toml_str(&source),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no config file, using defaults");
                Ok(Self::default())
            }
            Err(e) => Err(e.into()),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.retry.max_attempts == 0 {
            return Err(ConfigError::Invalid(
                "retry.max_attempts must be at least 1".to_string(),
            ));
        }
        if self.max_payload_bytes == 0 {
            return Err(ConfigError::Invalid(
                "max_payload_bytes must be positive".to_string(),
            ));
        }
        if Calendar::from_offset_secs(self.utc_offset_secs).is_none() {
            return Err(ConfigError::Invalid(format!(
                "utc_offset_secs out of range: {}",
                self.utc_offset_secs
            )));
        }
        Ok(())
    }

    /// Calendar used for day-based queries and cleanup gating
    pub fn calendar(&self) -> Calendar {
        Calendar::from_offset_secs(self.utc_offset_secs).unwrap_or_default()
    }

    pub fn with_max_payload_bytes(mut self, bytes: usize) -> Self {
        self.max_payload_bytes = bytes;
        self
    }

    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = ttl;
        self
    }

    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_utc_offset_secs(mut self, secs: i32) -> Self {
        self.utc_offset_secs = secs;
        self
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
