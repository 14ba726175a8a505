//! Daily totals and snapshot statistics.

use crate::prelude::*;

#[tokio::test]
async fn apple_and_banana_total_for_today() {
    let dir = TempDir::new().unwrap();
    let clock = FakeClock::at(t0());
    let store = open_store(&dir, &clock);

    store.add(apple().with_timestamp(t0())).await.unwrap();
    store
        .add(banana().with_timestamp(t0() + Duration::seconds(1)))
        .await
        .unwrap();

    assert_eq!(store.todays_totals(), Macros::new(200.0, 1.0, 52.0, 0.0));
    assert_eq!(store.total_entry_count(), 2);
    assert_eq!(store.latest_entry().unwrap().food_name, "Banana");
}

#[tokio::test]
async fn yesterday_does_not_count_today() {
    let dir = TempDir::new().unwrap();
    let clock = FakeClock::at(t0());
    let store = open_store(&dir, &clock);

    store
        .add(banana().with_timestamp(t0() - Duration::days(1)))
        .await
        .unwrap();
    store.add(apple()).await.unwrap();

    assert_eq!(store.todays_totals(), Macros::new(95.0, 0.0, 25.0, 0.0));
    let yesterday = NaiveDate::from_ymd_opt(2026, 6, 14).unwrap();
    assert_eq!(store.entries_for_date(yesterday)[0].food_name, "Banana");
}

#[tokio::test]
async fn stale_snapshot_is_refreshed_on_new_day() {
    let dir = TempDir::new().unwrap();
    let clock = FakeClock::at(t0());
    let store = open_store(&dir, &clock);

    assert!(store.refresh_if_stale().await.unwrap());
    clock.advance(Duration::hours(1));
    assert!(!store.refresh_if_stale().await.unwrap());
    clock.advance(Duration::hours(12));
    assert!(store.refresh_if_stale().await.unwrap());
}
