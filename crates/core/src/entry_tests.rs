// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use chrono::{TimeDelta, TimeZone};
use yare::parameterized;

fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 5, 1, 9, 30, 0).unwrap()
}

fn stored(username: &str, website: &str) -> Entry {
    EntryDraft::new("Account", username, "hunter2", website)
        .unwrap()
        .stamp(1, t0())
        .with_id(EntryId::from("entry-1"))
}

#[test]
fn draft_accepts_complete_fields() {
    let draft = EntryDraft::new("GH", "bob", "x", "github.com").unwrap();
    assert_eq!(draft.name(), "GH");
    assert_eq!(draft.username(), "bob");
    assert_eq!(draft.password(), "x");
    assert_eq!(draft.website(), "github.com");
    assert_eq!(draft.logo(), "");
}

#[parameterized(
    blank_name = { "", "bob", "x", "github.com", Field::Name },
    whitespace_name = { "   ", "bob", "x", "github.com", Field::Name },
    blank_username = { "GH", "", "x", "github.com", Field::Username },
    blank_password = { "GH", "bob", " \t", "github.com", Field::Password },
    blank_website = { "GH", "bob", "x", "", Field::Website },
)]
fn draft_rejects_blank_required_field(
    name: &str,
    username: &str,
    password: &str,
    website: &str,
    missing: Field,
) {
    let err = EntryDraft::new(name, username, password, website).unwrap_err();
    assert_eq!(err, DraftError::MissingField(missing));
}

#[test]
fn draft_keeps_password_verbatim() {
    let draft = EntryDraft::new("GH", "bob", "  pa ss  ", "github.com").unwrap();
    let entry = draft.stamp(3, t0()).with_id(EntryId::from("e"));
    assert_eq!(entry.password, "  pa ss  ");
}

#[test]
fn stamp_sets_both_timestamps_and_serial() {
    let entry = EntryDraft::new("GH", "bob", "x", "github.com")
        .unwrap()
        .with_logo("https://example.com/icon.png")
        .stamp(7, t0());
    assert_eq!(entry.serial_number, 7);
    assert_eq!(entry.created_at, t0());
    assert_eq!(entry.updated_at, t0());
    assert_eq!(entry.logo, "https://example.com/icon.png");
}

#[test]
fn entry_serializes_with_document_field_names() {
    let entry = stored("bob", "github.com");
    let json = serde_json::to_value(&entry).unwrap();
    assert_eq!(json["_id"], "entry-1");
    assert_eq!(json["serialNumber"], 1);
    assert!(json.get("createdAt").is_some());
    assert!(json.get("updatedAt").is_some());
    assert!(json.get("id").is_none());

    let back: Entry = serde_json::from_value(json).unwrap();
    assert_eq!(back, entry);
}

#[test]
fn entry_without_logo_decodes_with_empty_logo() {
    let json = serde_json::json!({
        "_id": "abc",
        "serialNumber": 4,
        "name": "TW",
        "username": "bob",
        "password": "y",
        "website": "twitter.com",
        "createdAt": "2026-05-01T09:30:00Z",
        "updatedAt": "2026-05-01T09:30:00Z",
    });
    let entry: Entry = serde_json::from_value(json).unwrap();
    assert_eq!(entry.logo, "");
    assert_eq!(entry.id, EntryId::from("abc"));
}

#[test]
fn patch_applies_only_supplied_fields() {
    let mut entry = stored("bob", "github.com");
    let before = entry.clone();
    let later = t0() + TimeDelta::seconds(5);

    EntryPatch::new().password("new-secret").apply(&mut entry, later);

    assert_eq!(entry.password, "new-secret");
    assert_eq!(entry.updated_at, later);
    assert_eq!(entry.name, before.name);
    assert_eq!(entry.username, before.username);
    assert_eq!(entry.website, before.website);
    assert_eq!(entry.serial_number, before.serial_number);
    assert_eq!(entry.created_at, before.created_at);
    assert_eq!(entry.id, before.id);
}

#[test]
fn empty_patch_still_touches_updated_at() {
    let mut entry = stored("bob", "github.com");
    let patch = EntryPatch::new();
    assert!(patch.is_empty());
    patch.apply(&mut entry, t0() + TimeDelta::minutes(1));
    assert_eq!(entry.updated_at, t0() + TimeDelta::minutes(1));
}

#[test]
fn patch_rejects_supplied_blank_field() {
    let patch = EntryPatch::new().name("ok").website("  ");
    assert_eq!(
        patch.validate(),
        Err(DraftError::MissingField(Field::Website))
    );
}

#[test]
fn patch_allows_blank_logo() {
    assert!(EntryPatch::new().logo("").validate().is_ok());
}

#[test]
fn patch_serializes_only_supplied_fields() {
    let json = serde_json::to_value(EntryPatch::new().username("carol")).unwrap();
    assert_eq!(json, serde_json::json!({ "username": "carol" }));
}

#[parameterized(
    mixed_case_query = { "alice", "www.example.com/login", "Alice", "Example.com", true },
    exact = { "bob", "github.com", "bob", "github.com", true },
    query_is_substring = { "bob", "https://github.com", "BOB", "github", true },
    different_user = { "bob", "github.com", "alice", "github.com", false },
    stored_is_substring_of_query = { "bob", "example.com", "bob", "www.example.com/login", false },
    username_prefix_is_not_enough = { "bobby", "github.com", "bob", "github.com", false },
)]
fn credential_matching(
    stored_user: &str,
    stored_site: &str,
    username: &str,
    website: &str,
    expected: bool,
) {
    let entry = stored(stored_user, stored_site);
    assert_eq!(matches_credential(&entry, username, website), expected);
}

#[test]
fn field_display_is_lowercase_name() {
    assert_eq!(Field::Username.to_string(), "username");
    assert_eq!(
        DraftError::MissingField(Field::Password).to_string(),
        "password is required"
    );
}
