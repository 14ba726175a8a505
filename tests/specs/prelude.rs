//! Shared fixtures for store specs.

#![allow(dead_code, unused_imports)]

pub use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
pub use nl_core::{
    CacheRecord, EntryDraft, EntryId, FakeClock, Macros, RetryConfig, SequentialIdGen,
    StoreConfig,
};
pub use nl_engine::{CacheSweeper, EntryStore, FakeEncoder, StoreError};
pub use nl_storage::{Persistence, WalConfig, WalPersistence};
pub use std::sync::Arc;
pub use tempfile::TempDir;

pub type WalStore = EntryStore<WalPersistence, FakeClock>;

/// Noon UTC on a fixed day
pub fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 6, 15, 12, 0, 0).unwrap()
}

pub fn config() -> StoreConfig {
    StoreConfig::default()
        .with_retry(RetryConfig::default().with_base_delay(std::time::Duration::from_millis(5)))
}

pub fn wal_config() -> WalConfig {
    WalConfig {
        compaction_threshold: 0,
        machine_id: "spec".to_string(),
    }
}

/// A store over a WAL in `dir`, with deterministic ids and encoder
pub fn open_store(dir: &TempDir, clock: &FakeClock) -> Arc<WalStore> {
    let persistence = WalPersistence::open(dir.path(), wal_config()).unwrap();
    Arc::new(
        EntryStore::with_clock(persistence, config(), clock.clone())
            .with_id_gen(SequentialIdGen::new("spec"))
            .with_encoder(FakeEncoder::new()),
    )
}

pub fn apple() -> EntryDraft {
    EntryDraft::new("Apple", Macros::new(95.0, 0.0, 25.0, 0.0))
}

pub fn banana() -> EntryDraft {
    EntryDraft::new("Banana", Macros::new(105.0, 1.0, 27.0, 0.0))
}
