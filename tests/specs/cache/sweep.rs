//! TTL eviction of cached lookups.

use crate::prelude::*;

fn hour() -> std::time::Duration {
    std::time::Duration::from_secs(3600)
}

fn seed(dir: &TempDir, records: Vec<CacheRecord>) {
    let mut wal = WalPersistence::open(dir.path(), wal_config()).unwrap();
    let ops = records
        .into_iter()
        .map(|record| nl_storage::Operation::CachePut { record })
        .collect();
    wal.commit(ops).unwrap();
}

#[tokio::test]
async fn sweep_removes_expired_and_keeps_boundary() {
    let dir = TempDir::new().unwrap();
    seed(
        &dir,
        vec![
            CacheRecord::new("expired", b"a".to_vec(), t0() - Duration::minutes(61), hour()),
            CacheRecord::new("boundary", b"b".to_vec(), t0() - Duration::hours(1), hour()),
            CacheRecord::new("fresh", b"c".to_vec(), t0(), hour()),
        ],
    );
    let clock = FakeClock::at(t0());
    let store = open_store(&dir, &clock);
    let sweeper = CacheSweeper::new(Arc::clone(&store));

    assert_eq!(sweeper.sweep().await.unwrap(), 1);
    assert_eq!(sweeper.sweep().await.unwrap(), 0);

    drop(sweeper);
    drop(store);
    let wal = WalPersistence::open(dir.path(), wal_config()).unwrap();
    let keys: Vec<String> = wal
        .cache_records()
        .unwrap()
        .into_iter()
        .map(|r| r.key)
        .collect();
    assert_eq!(keys, vec!["boundary", "fresh"]);
}
