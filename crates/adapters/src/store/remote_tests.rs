// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::proxy::{FakeDocumentProxy, ProxyError};
use crate::store::StoreError;
use chrono::{TimeDelta, TimeZone};
use serde_json::json;

fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 4, 2, 8, 0, 0).unwrap()
}

fn setup() -> (RemoteBackend<FakeDocumentProxy>, FakeDocumentProxy) {
    let proxy = FakeDocumentProxy::new();
    let backend = RemoteBackend::new(proxy.clone(), Namespace::new("keybook", "entries"));
    (backend, proxy)
}

fn draft(name: &str, username: &str, website: &str) -> EntryDraft {
    EntryDraft::new(name, username, "pw", website).unwrap()
}

#[tokio::test]
async fn create_reads_max_serial_then_inserts() {
    let (store, proxy) = setup();

    let entry = store.create(draft("GH", "bob", "github.com"), t0()).await.unwrap();

    assert_eq!(entry.id, EntryId::from("doc-1"));
    assert_eq!(entry.serial_number, 1);
    assert_eq!(entry.created_at, t0());
    assert_eq!(proxy.actions(), vec![Action::Aggregate, Action::InsertOne]);

    let calls = proxy.calls();
    assert_eq!(calls[0].body["database"], "keybook");
    assert_eq!(calls[0].body["collection"], "entries");
    assert_eq!(
        calls[0].body["pipeline"][0]["$group"]["maxSerial"],
        json!({ "$max": "$serialNumber" })
    );
    assert_eq!(calls[1].body["document"]["serialNumber"], 1);
    assert_eq!(calls[1].body["document"]["password"], "pw");
}

#[tokio::test]
async fn create_continues_from_stored_maximum() {
    let (store, proxy) = setup();
    proxy.insert_raw(json!({
        "_id": "legacy",
        "serialNumber": 41,
        "name": "Old",
        "username": "old",
        "password": "pw",
        "website": "old.example",
        "createdAt": "2025-01-01T00:00:00Z",
        "updatedAt": "2025-01-01T00:00:00Z",
    }));

    let entry = store.create(draft("New", "new", "x.com"), t0()).await.unwrap();
    assert_eq!(entry.serial_number, 42);
}

#[tokio::test]
async fn list_and_get_decode_documents() {
    let (store, _proxy) = setup();
    let created = store.create(draft("GH", "bob", "github.com"), t0()).await.unwrap();

    let all = store.list().await.unwrap();
    assert_eq!(all, vec![created.clone()]);

    let fetched = store.get(&created.id).await.unwrap();
    assert_eq!(fetched, created);
}

#[tokio::test]
async fn get_missing_is_not_found() {
    let (store, proxy) = setup();
    let err = store.get(&EntryId::from("missing")).await.unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(
        proxy.calls()[0].body["filter"],
        json!({ "_id": { "$oid": "missing" } })
    );
}

#[tokio::test]
async fn update_sets_patch_and_rereads() {
    let (store, proxy) = setup();
    let entry = store.create(draft("GH", "bob", "github.com"), t0()).await.unwrap();
    proxy.clear_calls();

    let later = t0() + TimeDelta::minutes(5);
    let updated = store
        .update(&entry.id, &EntryPatch::new().name("GitHub"), later)
        .await
        .unwrap();

    assert_eq!(updated.name, "GitHub");
    assert_eq!(updated.username, "bob");
    assert_eq!(updated.serial_number, entry.serial_number);
    assert_eq!(updated.created_at, t0());
    assert_eq!(updated.updated_at, later);
    assert_eq!(proxy.actions(), vec![Action::UpdateOne, Action::FindOne]);

    let set = &proxy.calls()[0].body["update"]["$set"];
    assert_eq!(set["name"], "GitHub");
    assert!(set.get("username").is_none());
}

#[tokio::test]
async fn update_missing_is_not_found() {
    let (store, _proxy) = setup();
    let err = store
        .update(&EntryId::from("ghost"), &EntryPatch::new().name("x"), t0())
        .await
        .unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn delete_removes_and_reports_missing() {
    let (store, proxy) = setup();
    let entry = store.create(draft("GH", "bob", "github.com"), t0()).await.unwrap();

    store.delete(&entry.id).await.unwrap();
    assert!(proxy.documents().is_empty());

    let err = store.delete(&entry.id).await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn exists_uses_case_insensitive_credential_filter() {
    let (store, _proxy) = setup();
    store
        .create(draft("Ex", "alice", "www.example.com/login"), t0())
        .await
        .unwrap();

    assert!(store.exists("Alice", "Example.com").await.unwrap());
    assert!(!store.exists("alice", "example.org").await.unwrap());
    assert!(!store.exists("alic", "example.com").await.unwrap());
    // Query is the needle, stored website the haystack
    assert!(!store
        .exists("alice", "https://www.example.com/login/extra")
        .await
        .unwrap());
}

#[tokio::test]
async fn exists_treats_input_literally() {
    let (store, _proxy) = setup();
    store.create(draft("Ex", "a.b", "example.com"), t0()).await.unwrap();

    assert!(store.exists("a.b", "example.com").await.unwrap());
    assert!(!store.exists("a.*", "example.com").await.unwrap());
}

#[tokio::test]
async fn concurrent_creates_can_share_a_serial() {
    let (store, proxy) = setup();

    let (a, b) = tokio::join!(
        store.create(draft("A", "a", "a.com"), t0()),
        store.create(draft("B", "b", "b.com"), t0()),
    );
    let (a, b) = (a.unwrap(), b.unwrap());

    assert_ne!(a.id, b.id);
    assert_eq!(a.serial_number, 1);
    assert_eq!(b.serial_number, 1);
    assert_eq!(
        proxy.actions(),
        vec![
            Action::Aggregate,
            Action::Aggregate,
            Action::InsertOne,
            Action::InsertOne
        ]
    );
}

#[tokio::test]
async fn status_error_message_propagates() {
    let (store, proxy) = setup();
    proxy.fail_next(
        Action::Find,
        ProxyError::Status {
            status: 401,
            message: "invalid api key".into(),
        },
    );

    let err = store.list().await.unwrap_err();
    assert!(matches!(&err, StoreError::Backend(ProxyError::Status { status: 401, .. })));
    assert_eq!(err.to_string(), "backend failure: invalid api key");
}

#[tokio::test]
async fn failed_aggregate_aborts_create() {
    let (store, proxy) = setup();
    proxy.fail_next(Action::Aggregate, ProxyError::Transport("reset".into()));

    let err = store
        .create(draft("GH", "bob", "github.com"), t0())
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::Backend(ProxyError::Transport(_))));
    assert_eq!(proxy.actions(), vec![Action::Aggregate]);
}

#[tokio::test]
async fn malformed_response_is_decode_error() {
    let (store, proxy) = setup();
    proxy.insert_raw(json!({ "_id": "bad", "serialNumber": "not a number" }));

    let err = store.list().await.unwrap_err();
    assert!(matches!(err, StoreError::Backend(ProxyError::Decode(_))));
}

#[tokio::test]
async fn accessors_expose_shared_proxy_and_namespace() {
    let (store, proxy) = setup();
    assert_eq!(store.namespace(), &Namespace::new("keybook", "entries"));

    store.create(draft("GH", "bob", "github.com"), t0()).await.unwrap();
    assert_eq!(store.proxy().documents().len(), 1);
    assert_eq!(proxy.documents().len(), 1);
}
