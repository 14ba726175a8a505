//! Photo compression on write and scheduled reclamation.

use crate::prelude::*;

const MB: usize = 1_048_576;

#[tokio::test]
async fn old_large_photo_is_capped_then_reclaimed() {
    let dir = TempDir::new().unwrap();
    let clock = FakeClock::at(t0());
    let store = open_store(&dir, &clock);

    let entry = store
        .add(
            apple()
                .with_timestamp(t0() - Duration::days(10))
                .with_photo(vec![0x42u8; 6 * MB]),
        )
        .await
        .unwrap();
    assert!(entry.photo_bytes() <= 5 * MB as u64);

    let cleanup = store.cleanup_old_photos(7).await.unwrap();
    assert_eq!(cleanup.count, 1);
    assert!(cleanup.space_reclaimed_mb > 0.0);

    // Payload gone, everything else intact, across a reopen
    drop(store);
    let store = open_store(&dir, &clock);
    let all = store.fetch_all().await.unwrap();
    assert_eq!(all.len(), 1);
    assert!(all[0].image_payload.is_none());
    assert_eq!(all[0].id, entry.id);
    assert_eq!(all[0].macros, entry.macros);
}

#[tokio::test]
async fn cleanup_twice_reports_nothing_the_second_time() {
    let dir = TempDir::new().unwrap();
    let clock = FakeClock::at(t0());
    let store = open_store(&dir, &clock);
    store
        .add(
            banana()
                .with_timestamp(t0() - Duration::days(8))
                .with_photo(vec![1u8; 4096]),
        )
        .await
        .unwrap();

    store.cleanup_old_photos(7).await.unwrap();
    let second = store.cleanup_old_photos(7).await.unwrap();

    assert_eq!(second.count, 0);
    assert_eq!(second.space_reclaimed_mb, 0.0);
}

#[tokio::test]
async fn small_photo_is_stored_byte_identical() {
    let dir = TempDir::new().unwrap();
    let clock = FakeClock::at(t0());
    let store = open_store(&dir, &clock);
    let bytes: Vec<u8> = (0..=255u8).cycle().take(10_000).collect();

    let entry = store.add(apple().with_photo(bytes.clone())).await.unwrap();

    assert_eq!(entry.image_payload.unwrap().as_bytes(), bytes.as_slice());
    assert!((store.estimated_photo_storage_mb() - 10_000.0 / MB as f64).abs() < 1e-12);
}
