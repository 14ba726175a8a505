//! Entry add / update / delete over a real log.

use crate::prelude::*;

#[tokio::test]
async fn added_entry_survives_reopen() {
    let dir = TempDir::new().unwrap();
    let clock = FakeClock::at(t0());

    let added = {
        let store = open_store(&dir, &clock);
        store.add(apple()).await.unwrap()
    };

    let store = open_store(&dir, &clock);
    let all = store.fetch_all().await.unwrap();
    assert_eq!(all, vec![added]);
}

#[tokio::test]
async fn fetch_all_is_newest_first() {
    let dir = TempDir::new().unwrap();
    let clock = FakeClock::at(t0());
    let store = open_store(&dir, &clock);

    store.add(apple()).await.unwrap();
    clock.advance(Duration::minutes(5));
    store.add(banana()).await.unwrap();

    let names: Vec<String> = store
        .fetch_all()
        .await
        .unwrap()
        .into_iter()
        .map(|e| e.food_name)
        .collect();
    assert_eq!(names, vec!["Banana", "Apple"]);
}

#[tokio::test]
async fn update_and_delete_are_durable() {
    let dir = TempDir::new().unwrap();
    let clock = FakeClock::at(t0());

    let (kept, removed) = {
        let store = open_store(&dir, &clock);
        let a = store.add(apple()).await.unwrap();
        let b = store.add(banana()).await.unwrap();

        let mut edited = a.clone();
        edited.macros = Macros::new(52.0, 0.3, 14.0, 0.2);
        let kept = store.update(edited).await.unwrap();
        store.delete(&b.id).await.unwrap();
        (kept, b)
    };

    let store = open_store(&dir, &clock);
    let all = store.fetch_all().await.unwrap();
    assert_eq!(all, vec![kept]);
    assert!(all.iter().all(|e| e.id != removed.id));
}

#[tokio::test]
async fn failures_land_in_the_error_slot() {
    let dir = TempDir::new().unwrap();
    let clock = FakeClock::at(t0());
    let store = open_store(&dir, &clock);

    let err = store.delete(&EntryId::new("missing")).await.unwrap_err();
    assert!(matches!(err, StoreError::NotFound { .. }));
    assert_eq!(store.last_error().unwrap().operation, "delete");

    store.clear_error();
    assert!(store.last_error().is_none());
}

#[tokio::test]
async fn subscribers_see_committed_changes() {
    let dir = TempDir::new().unwrap();
    let clock = FakeClock::at(t0());
    let store = open_store(&dir, &clock);
    let mut events = store.subscribe("**");

    let added = store.add(apple()).await.unwrap();
    store.delete(&added.id).await.unwrap();

    assert_eq!(events.recv().await.unwrap().name(), "entry:added");
    assert_eq!(events.recv().await.unwrap().name(), "entry:deleted");
}
