// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Start-up maintenance: cache sweep plus once-a-day photo cleanup

use crate::error::StoreError;
use crate::store::{EntryStore, PhotoCleanup};
use crate::sweeper::CacheSweeper;
use chrono::NaiveDate;
use nl_core::{Clock, SystemClock};
use nl_storage::Persistence;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;

const MARKER_FILE: &str = "maintenance.json";

#[derive(Debug, Error)]
pub enum MarkerError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed marker: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum MaintenanceError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("maintenance marker: {0}")]
    Marker(#[from] MarkerError),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct MarkerContents {
    last_photo_cleanup: NaiveDate,
}

/// JSON file remembering the last calendar day photo cleanup ran
#[derive(Debug, Clone)]
pub struct MaintenanceMarker {
    path: PathBuf,
}

impl MaintenanceMarker {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Marker stored under `dir` with the default file name
    pub fn in_dir(dir: &Path) -> Self {
        Self::new(dir.join(MARKER_FILE))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// `None` if cleanup has never run
    pub fn last_cleanup(&self) -> Result<Option<NaiveDate>, MarkerError> {
        let json = match std::fs::read_to_string(&self.path) {
            Ok(json) => json,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let contents: MarkerContents = serde_json::from_str(&json)?;
        Ok(Some(contents.last_photo_cleanup))
    }

    pub fn record_cleanup(&self, date: NaiveDate) -> Result<(), MarkerError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(&MarkerContents {
            last_photo_cleanup: date,
        })?;

        let temp_path = self.path.with_extension("json.tmp");
        std::fs::write(&temp_path, json)?;
        std::fs::rename(&temp_path, &self.path)?;
        Ok(())
    }
}

/// What a start-up run did
#[derive(Debug, Clone, PartialEq)]
pub struct MaintenanceReport {
    pub cache_records_swept: usize,
    /// `None` when cleanup already ran today
    pub photo_cleanup: Option<PhotoCleanup>,
}

pub struct Maintenance<P: Persistence, C: Clock = SystemClock> {
    store: Arc<EntryStore<P, C>>,
    sweeper: CacheSweeper<P, C>,
    marker: MaintenanceMarker,
}

impl<P: Persistence, C: Clock> Maintenance<P, C> {
    pub fn new(store: Arc<EntryStore<P, C>>, marker: MaintenanceMarker) -> Self {
        Self {
            sweeper: CacheSweeper::new(Arc::clone(&store)),
            store,
            marker,
        }
    }

    /// Sweep the cache, then clean up old photos unless that already
    /// happened today.
    pub async fn run_startup(&self) -> Result<MaintenanceReport, MaintenanceError> {
        let cache_records_swept = self.sweeper.sweep().await?;

        let today = self.store.today();
        if self.marker.last_cleanup()? == Some(today) {
            tracing::debug!(%today, "photo cleanup already ran today");
            return Ok(MaintenanceReport {
                cache_records_swept,
                photo_cleanup: None,
            });
        }

        let retention_days = self.store.config().photo_retention_days;
        let cleanup = self.store.cleanup_old_photos(retention_days).await?;
        self.marker.record_cleanup(today)?;

        tracing::info!(
            cache_records_swept,
            photos_cleaned = cleanup.count,
            retention_days,
            "start-up maintenance complete"
        );
        Ok(MaintenanceReport {
            cache_records_swept,
            photo_cleanup: Some(cleanup),
        })
    }
}

#[cfg(test)]
#[path = "maintenance_tests.rs"]
mod tests;
