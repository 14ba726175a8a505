//! Log replay after a torn write.

use crate::prelude::*;
use std::io::Write;

#[tokio::test]
async fn torn_tail_is_ignored_then_repaired() {
    let dir = TempDir::new().unwrap();
    let clock = FakeClock::at(t0());
    let added = {
        let store = open_store(&dir, &clock);
        store.add(apple()).await.unwrap()
    };

    // Simulate a crash mid-append
    let wal_path = dir.path().join("wal.jsonl");
    let mut file = std::fs::OpenOptions::new()
        .append(true)
        .open(&wal_path)
        .unwrap();
    file.write_all(b"{\"sequence\":2,\"timest").unwrap();
    drop(file);

    let store = open_store(&dir, &clock);
    assert_eq!(store.fetch_all().await.unwrap(), vec![added.clone()]);
    drop(store);

    let removed = WalPersistence::repair(dir.path()).unwrap();
    assert!(removed > 0);

    let store = open_store(&dir, &clock);
    assert_eq!(store.fetch_all().await.unwrap(), vec![added]);
}

#[tokio::test]
async fn writes_after_torn_tail_are_never_silently_lost() {
    let dir = TempDir::new().unwrap();
    let clock = FakeClock::at(t0());
    let apple_entry = {
        let store = open_store(&dir, &clock);
        store.add(apple()).await.unwrap()
    };
    let wal_path = dir.path().join("wal.jsonl");
    let mut file = std::fs::OpenOptions::new()
        .append(true)
        .open(&wal_path)
        .unwrap();
    file.write_all(b"{\"sequence\":2,\"timest").unwrap();
    drop(file);

    let reopen = |prefix: &str| {
        let persistence = WalPersistence::open(dir.path(), wal_config()).unwrap();
        EntryStore::with_clock(persistence, config(), clock.clone())
            .with_id_gen(SequentialIdGen::new(prefix))
            .with_encoder(FakeEncoder::new())
    };

    // Refused outright rather than appended behind the torn line
    let store = reopen("after");
    let err = store.add(banana()).await.unwrap_err();
    assert!(matches!(err, StoreError::Persistence { attempts: 1, .. }));
    drop(store);

    WalPersistence::repair(dir.path()).unwrap();
    let store = reopen("after");
    let banana_entry = store.add(banana()).await.unwrap();
    drop(store);

    let store = reopen("later");
    let entries = store.fetch_all().await.unwrap();
    assert_eq!(entries.len(), 2);
    assert!(entries.contains(&apple_entry));
    assert!(entries.contains(&banana_entry));
}
