// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use chrono::{Duration, TimeZone, Utc};
use nl_core::{EntryDraft, Macros};

fn entry(id: &str, minutes: i64, photo: bool) -> Entry {
    let t0 = Utc.with_ymd_and_hms(2026, 6, 1, 12, 0, 0).unwrap();
    let mut draft = EntryDraft::new(format!("food {id}"), Macros::new(100.0, 5.0, 10.0, 2.0))
        .with_timestamp(t0 + Duration::minutes(minutes));
    if photo {
        draft = draft.with_photo(vec![7u8; 64]);
    }
    draft.into_entry(EntryId::new(id), t0)
}

#[test]
fn apply_entry_put_and_delete() {
    let mut state = Collections::new();
    state.apply(&Operation::EntryPut {
        entry: entry("e-1", 0, false),
    });
    assert!(state.entries.contains_key(&EntryId::new("e-1")));

    state.apply(&Operation::EntryDelete {
        id: EntryId::new("e-1"),
    });
    assert!(state.entries.is_empty());
}

#[test]
fn entry_put_replaces_existing() {
    let mut state = Collections::new();
    state.apply(&Operation::EntryPut {
        entry: entry("e-1", 0, false),
    });

    let mut renamed = entry("e-1", 0, false);
    renamed.food_name = "renamed".to_string();
    state.apply(&Operation::EntryPut { entry: renamed });

    assert_eq!(state.entries.len(), 1);
    assert_eq!(state.entries[&EntryId::new("e-1")].food_name, "renamed");
}

#[test]
fn payloads_cleared_keeps_records() {
    let mut state = Collections::new();
    state.apply(&Operation::EntryPut {
        entry: entry("e-1", 0, true),
    });
    state.apply(&Operation::PayloadsCleared {
        ids: vec![EntryId::new("e-1"), EntryId::new("missing")],
    });

    let kept = &state.entries[&EntryId::new("e-1")];
    assert!(kept.image_payload.is_none());
    assert_eq!(kept.macros.calories, 100.0);
}

#[test]
fn cache_put_and_delete() {
    let mut state = Collections::new();
    let record = CacheRecord::new(
        "737628064502",
        b"{}".to_vec(),
        Utc::now(),
        std::time::Duration::from_secs(3600),
    );
    state.apply(&Operation::CachePut { record });
    assert_eq!(state.cache.len(), 1);

    state.apply(&Operation::CacheDelete {
        keys: vec!["737628064502".to_string()],
    });
    assert!(state.cache.is_empty());
}

#[test]
fn entries_sorted_newest_first() {
    let mut state = Collections::new();
    state.apply_all(&[
        Operation::EntryPut {
            entry: entry("old", 0, false),
        },
        Operation::EntryPut {
            entry: entry("new", 30, false),
        },
        Operation::EntryPut {
            entry: entry("mid", 10, false),
        },
    ]);

    let ids: Vec<_> = state
        .entries_newest_first()
        .into_iter()
        .map(|e| e.id.0)
        .collect();
    assert_eq!(ids, vec!["new", "mid", "old"]);
}

#[test]
fn to_operations_rebuilds_state() {
    let mut state = Collections::new();
    state.apply(&Operation::EntryPut {
        entry: entry("e-1", 0, true),
    });
    state.apply(&Operation::CachePut {
        record: CacheRecord::new("k", b"v".to_vec(), Utc::now(), std::time::Duration::from_secs(5)),
    });

    let mut rebuilt = Collections::new();
    rebuilt.apply_all(&state.to_operations());
    assert_eq!(rebuilt, state);
}
