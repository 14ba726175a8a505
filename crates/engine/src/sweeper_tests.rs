// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::error::ErrorKind;
use chrono::{DateTime, Duration, TimeZone, Utc};
use nl_core::{CacheRecord, EntryDraft, FakeClock, Macros, StoreConfig};
use nl_storage::{Collections, FakePersistence};
use std::io;

fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 6, 15, 8, 0, 0).unwrap()
}

fn hour() -> std::time::Duration {
    std::time::Duration::from_secs(3600)
}

fn seeded(records: &[CacheRecord]) -> FakePersistence {
    let mut collections = Collections::new();
    for record in records {
        collections.cache.insert(record.key.clone(), record.clone());
    }
    FakePersistence::with_collections(collections)
}

fn setup(
    persistence: &FakePersistence,
    clock: &FakeClock,
) -> (Arc<EntryStore<FakePersistence, FakeClock>>, CacheSweeper<FakePersistence, FakeClock>) {
    let store = Arc::new(EntryStore::with_clock(
        persistence.clone(),
        StoreConfig::default(),
        clock.clone(),
    ));
    let sweeper = CacheSweeper::new(Arc::clone(&store));
    (store, sweeper)
}

#[tokio::test]
async fn sweep_deletes_only_expired_records() {
    let persistence = seeded(&[
        CacheRecord::new("stale", b"a".to_vec(), t0() - Duration::hours(2), hour()),
        CacheRecord::new("fresh", b"b".to_vec(), t0() - Duration::minutes(10), hour()),
    ]);
    let clock = FakeClock::at(t0());
    let (store, sweeper) = setup(&persistence, &clock);
    let mut events = store.subscribe("cache:*");

    assert_eq!(sweeper.sweep().await.unwrap(), 1);

    let remaining = persistence.snapshot().cache;
    assert!(remaining.contains_key("fresh"));
    assert!(!remaining.contains_key("stale"));
    assert_eq!(
        events.recv().await.unwrap(),
        StoreEvent::CacheSwept { deleted: 1 }
    );
}

#[tokio::test]
async fn record_exactly_at_ttl_is_kept() {
    let persistence = seeded(&[CacheRecord::new("edge", b"x".to_vec(), t0(), hour())]);
    let clock = FakeClock::at(t0());
    let (_store, sweeper) = setup(&persistence, &clock);

    clock.advance(Duration::hours(1));
    assert_eq!(sweeper.sweep().await.unwrap(), 0);

    clock.advance(Duration::seconds(1));
    assert_eq!(sweeper.sweep().await.unwrap(), 1);
    assert!(persistence.snapshot().cache.is_empty());
}

#[tokio::test]
async fn sweep_is_idempotent() {
    let persistence = seeded(&[
        CacheRecord::new("a", b"1".to_vec(), t0() - Duration::days(1), hour()),
        CacheRecord::new("b", b"2".to_vec(), t0() - Duration::days(1), hour()),
    ]);
    let clock = FakeClock::at(t0());
    let (_store, sweeper) = setup(&persistence, &clock);

    assert_eq!(sweeper.sweep().await.unwrap(), 2);
    assert_eq!(sweeper.sweep().await.unwrap(), 0);
    // One batch for the first sweep, nothing for the second
    assert_eq!(persistence.committed_batches().len(), 1);
}

#[tokio::test]
async fn empty_cache_sweeps_nothing() {
    let persistence = FakePersistence::new();
    let clock = FakeClock::at(t0());
    let (_store, sweeper) = setup(&persistence, &clock);

    assert_eq!(sweeper.sweep().await.unwrap(), 0);
    assert_eq!(persistence.commit_attempts(), 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn sweep_shares_the_writer_flag() {
    let persistence = seeded(&[CacheRecord::new(
        "stale",
        b"a".to_vec(),
        t0() - Duration::days(1),
        hour(),
    )]);
    let clock = FakeClock::at(t0());
    let (store, sweeper) = setup(&persistence, &clock);
    let gate = persistence.hold_next_commit();

    let writer = Arc::clone(&store);
    let add = tokio::spawn(async move {
        writer
            .add(EntryDraft::new("Tea", Macros::new(2.0, 0.0, 0.5, 0.0)))
            .await
    });
    let entered = gate.clone();
    tokio::task::spawn_blocking(move || entered.wait_entered())
        .await
        .unwrap();

    let err = sweeper.sweep().await.unwrap_err();
    assert!(matches!(
        err,
        StoreError::ConcurrencyRejected { operation: "sweep" }
    ));

    gate.release();
    add.await.unwrap().unwrap();
    assert_eq!(sweeper.sweep().await.unwrap(), 1);
}

#[tokio::test]
async fn failed_sweep_is_recorded() {
    let persistence = seeded(&[CacheRecord::new(
        "stale",
        b"a".to_vec(),
        t0() - Duration::days(1),
        hour(),
    )]);
    persistence.fail_next_commits(1, io::ErrorKind::PermissionDenied);
    let clock = FakeClock::at(t0());
    let (store, sweeper) = setup(&persistence, &clock);

    assert!(sweeper.sweep().await.is_err());

    let last = store.last_error().unwrap();
    assert_eq!(last.operation, "sweep");
    assert_eq!(last.kind, ErrorKind::Persistence);
    assert_eq!(persistence.snapshot().cache.len(), 1);
}
