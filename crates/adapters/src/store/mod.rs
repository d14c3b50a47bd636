// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Entry store backends

mod memory;
mod remote;

pub use memory::{sample_entries, InMemoryBackend};
pub use remote::RemoteBackend;

use crate::proxy::ProxyError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use kb_core::{DraftError, Entry, EntryDraft, EntryId, EntryPatch};
use thiserror::Error;

/// Errors from entry store operations
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("entry not found: {0}")]
    NotFound(EntryId),
    #[error("invalid entry: {0}")]
    InvalidDraft(#[from] DraftError),
    #[error("backend failure: {0}")]
    Backend(#[from] ProxyError),
    #[error("backend failure: {0}")]
    Internal(String),
}

impl StoreError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound(_))
    }
}

/// A persistence variant for credential entries.
///
/// Every call is a suspension point. Implementations assign ids and serial
/// numbers on `create`; callers supply the timestamp so all variants share
/// one clock.
#[async_trait]
pub trait EntryBackend: Clone + Send + Sync + 'static {
    /// Every stored entry, in no guaranteed order
    async fn list(&self) -> Result<Vec<Entry>, StoreError>;

    /// A single entry by id
    async fn get(&self, id: &EntryId) -> Result<Entry, StoreError>;

    /// Allocate a serial, persist, and return the stored entry
    async fn create(&self, draft: EntryDraft, now: DateTime<Utc>) -> Result<Entry, StoreError>;

    /// Merge `patch` onto the stored entry and return the stored result
    async fn update(
        &self,
        id: &EntryId,
        patch: &EntryPatch,
        now: DateTime<Utc>,
    ) -> Result<Entry, StoreError>;

    /// Remove an entry permanently
    async fn delete(&self, id: &EntryId) -> Result<(), StoreError>;

    /// True if any stored entry matches the credential pair
    /// (see [`kb_core::matches_credential`])
    async fn exists(&self, username: &str, website: &str) -> Result<bool, StoreError>;
}
