//! Single-writer discipline.

use crate::prelude::*;
use nl_storage::FakePersistence;

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn second_add_during_in_flight_add_is_rejected() {
    let persistence = FakePersistence::new();
    let clock = FakeClock::at(t0());
    let store = Arc::new(EntryStore::with_clock(persistence.clone(), config(), clock));
    let gate = persistence.hold_next_commit();

    let first_store = Arc::clone(&store);
    let first = tokio::spawn(async move { first_store.add(apple()).await });
    let entered = gate.clone();
    tokio::task::spawn_blocking(move || entered.wait_entered())
        .await
        .unwrap();

    let second = store.add(banana()).await;
    assert!(matches!(
        second,
        Err(StoreError::ConcurrencyRejected { .. })
    ));

    gate.release();
    first.await.unwrap().unwrap();

    assert_eq!(store.fetch_all().await.unwrap().len(), 1);
}

#[tokio::test]
async fn sequential_writes_are_never_rejected() {
    let dir = TempDir::new().unwrap();
    let clock = FakeClock::at(t0());
    let store = open_store(&dir, &clock);
    let sweeper = CacheSweeper::new(Arc::clone(&store));

    for _ in 0..5 {
        store.add(apple()).await.unwrap();
        sweeper.sweep().await.unwrap();
    }
    assert_eq!(store.total_entry_count(), 5);
}
