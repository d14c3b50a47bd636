// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! kb-core: Core types for the Keybook credential store
//!
//! This crate provides:
//! - The `Entry` value type with validated drafts and partial patches
//! - Serial number allocation from the current entry set
//! - Dashboard search and sort over entry lists
//! - Random password generation for new entries
//! - A cancellable deferred task used for debounced checks
//! - Clock and ID generation abstractions for deterministic tests

pub mod clock;
pub mod id;

pub mod debounce;
pub mod entry;
pub mod password;
pub mod query;
pub mod serial;

// Re-exports
pub use clock::{Clock, FakeClock, SystemClock};
pub use debounce::Debouncer;
pub use entry::{
    matches_credential, DraftError, Entry, EntryDraft, EntryId, EntryPatch, Field, NewEntry,
};
pub use id::{IdGen, SequentialIdGen, UuidIdGen};
pub use password::{
    generate_password, generate_password_with, DEFAULT_PASSWORD_LENGTH, PASSWORD_CHARSET,
};
pub use query::{EntryQuery, SortDirection, SortField};
