// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Entry facade tests

use super::*;
use chrono::{TimeDelta, TimeZone, Utc};
use kb_adapters::{Action, FakeDocumentProxy, InMemoryBackend, Namespace, RemoteBackend};
use kb_core::{DraftError, FakeClock, Field, SequentialIdGen, SortDirection, SortField};

fn clock() -> FakeClock {
    FakeClock::at(Utc.with_ymd_and_hms(2026, 5, 1, 12, 0, 0).unwrap())
}

fn memory_store() -> EntryStore<InMemoryBackend<SequentialIdGen>, FakeClock> {
    EntryStore::with_clock(
        InMemoryBackend::with_id_gen(SequentialIdGen::new("mem")),
        clock(),
    )
}

fn remote_store(
    mode: AllocationMode,
) -> (EntryStore<RemoteBackend<FakeDocumentProxy>, FakeClock>, FakeDocumentProxy) {
    let proxy = FakeDocumentProxy::new();
    let backend = RemoteBackend::new(proxy.clone(), Namespace::new("keybook", "entries"));
    (
        EntryStore::with_clock(backend, clock()).allocation(mode),
        proxy,
    )
}

fn draft(name: &str, username: &str, website: &str) -> EntryDraft {
    EntryDraft::new(name, username, "s3cret", website).unwrap()
}

#[test]
fn allocation_defaults_to_serialized() {
    assert_eq!(AllocationMode::default(), AllocationMode::Serialized);
    assert_eq!(memory_store().allocation_mode(), AllocationMode::Serialized);
}

#[tokio::test]
async fn create_stamps_timestamps_from_clock() {
    let store = memory_store();
    let entry = store.create(draft("GH", "bob", "github.com")).await.unwrap();

    assert_eq!(entry.created_at, store.clock().now());
    assert_eq!(entry.updated_at, entry.created_at);
    assert_eq!(entry.password, "s3cret");
}

#[tokio::test]
async fn update_refreshes_updated_at_only() {
    let store = memory_store();
    let entry = store.create(draft("GH", "bob", "github.com")).await.unwrap();
    store.clock().advance(TimeDelta::seconds(30));

    let updated = store
        .update(&entry.id, EntryPatch::new().username("robert"))
        .await
        .unwrap();

    assert_eq!(updated.username, "robert");
    assert_eq!(updated.name, entry.name);
    assert_eq!(updated.created_at, entry.created_at);
    assert!(updated.updated_at > entry.updated_at);
}

#[tokio::test]
async fn blank_patch_field_is_rejected_before_backend() {
    let (store, proxy) = remote_store(AllocationMode::Serialized);
    let err = store
        .update(&EntryId::from("any"), EntryPatch::new().website("  "))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        StoreError::InvalidDraft(DraftError::MissingField(Field::Website))
    ));
    assert!(proxy.calls().is_empty());
}

#[tokio::test]
async fn not_found_surfaces_from_every_keyed_operation() {
    let store = memory_store();
    let id = EntryId::from("missing");

    assert!(store.get_by_id(&id).await.unwrap_err().is_not_found());
    assert!(store
        .update(&id, EntryPatch::new().name("x"))
        .await
        .unwrap_err()
        .is_not_found());
    assert!(store.delete(&id).await.unwrap_err().is_not_found());
}

#[tokio::test]
async fn check_username_is_advisory() {
    let store = memory_store();
    store.create(draft("A", "alice", "example.com")).await.unwrap();

    assert!(store.check_username("ALICE", "example.com").await.unwrap());
    // Duplicates are still accepted
    let dup = store.create(draft("A2", "alice", "example.com")).await.unwrap();
    assert_eq!(dup.serial_number, 2);
}

#[tokio::test]
async fn serialized_remote_creates_get_distinct_serials() {
    let (store, proxy) = remote_store(AllocationMode::Serialized);

    let (a, b) = tokio::join!(
        store.create(draft("A", "a", "a.com")),
        store.create(draft("B", "b", "b.com")),
    );

    let mut serials = vec![a.unwrap().serial_number, b.unwrap().serial_number];
    serials.sort();
    assert_eq!(serials, vec![1, 2]);
    assert_eq!(
        proxy.actions(),
        vec![
            Action::Aggregate,
            Action::InsertOne,
            Action::Aggregate,
            Action::InsertOne
        ]
    );
}

#[tokio::test]
async fn unsynchronized_remote_creates_can_duplicate_serials() {
    let (store, _proxy) = remote_store(AllocationMode::Unsynchronized);

    let (a, b) = tokio::join!(
        store.create(draft("A", "a", "a.com")),
        store.create(draft("B", "b", "b.com")),
    );

    assert_eq!(a.unwrap().serial_number, b.unwrap().serial_number);
}

#[tokio::test]
async fn unsynchronized_memory_creates_stay_distinct() {
    let store = memory_store().allocation(AllocationMode::Unsynchronized);

    let (a, b, c) = tokio::join!(
        store.create(draft("A", "a", "a.com")),
        store.create(draft("B", "b", "b.com")),
        store.create(draft("C", "c", "c.com")),
    );

    let mut serials = vec![
        a.unwrap().serial_number,
        b.unwrap().serial_number,
        c.unwrap().serial_number,
    ];
    serials.sort();
    assert_eq!(serials, vec![1, 2, 3]);
}

#[tokio::test]
async fn query_filters_and_sorts() {
    let store = memory_store();
    for (name, user, site) in [
        ("Zeta", "z", "github.com"),
        ("Alpha", "a", "gitlab.com"),
        ("Mid", "m", "twitter.com"),
    ] {
        store.create(draft(name, user, site)).await.unwrap();
    }

    let query = EntryQuery::new()
        .search("GIT")
        .sort_by(SortField::Name)
        .direction(SortDirection::Ascending);
    let names: Vec<_> = store
        .query(&query)
        .await
        .unwrap()
        .into_iter()
        .map(|e| e.name)
        .collect();
    assert_eq!(names, vec!["Alpha", "Zeta"]);

    let by_serial_desc = EntryQuery::new().direction(SortDirection::Descending);
    let serials: Vec<_> = store
        .query(&by_serial_desc)
        .await
        .unwrap()
        .into_iter()
        .map(|e| e.serial_number)
        .collect();
    assert_eq!(serials, vec![3, 2, 1]);
}

#[tokio::test]
async fn store_remains_usable_after_backend_failure() {
    let (store, proxy) = remote_store(AllocationMode::Serialized);
    proxy.fail_next(
        Action::Aggregate,
        kb_adapters::ProxyError::Transport("connection reset".into()),
    );

    assert!(store.create(draft("A", "a", "a.com")).await.is_err());
    let entry = store.create(draft("A", "a", "a.com")).await.unwrap();
    assert_eq!(entry.serial_number, 1);
}

#[tokio::test]
async fn backend_sees_facade_writes() {
    let store = memory_store();
    store.create(draft("GH", "bob", "github.com")).await.unwrap();
    assert_eq!(store.backend().len(), 1);
}
