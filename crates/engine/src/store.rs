// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Entry facade over a single injected backend

use kb_adapters::{EntryBackend, StoreError};
use kb_core::{Clock, Entry, EntryDraft, EntryId, EntryPatch, EntryQuery, SystemClock};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

/// How `create` coordinates serial allocation across concurrent callers
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AllocationMode {
    /// Creates issued through one store run one at a time
    #[default]
    Serialized,
    /// Creates run concurrently; a read-then-write backend may hand two of
    /// them the same serial
    Unsynchronized,
}

/// Entry facade
///
/// Every consumer goes through this type. It stamps timestamps from its
/// clock, rejects invalid patches before touching the backend, and
/// optionally serializes creates so serial allocation cannot interleave
/// within one process.
pub struct EntryStore<B, C = SystemClock> {
    backend: B,
    clock: C,
    allocation: AllocationMode,
    create_lock: Mutex<()>,
}

impl<B: EntryBackend> EntryStore<B, SystemClock> {
    pub fn new(backend: B) -> Self {
        Self::with_clock(backend, SystemClock)
    }
}

impl<B: EntryBackend, C: Clock> EntryStore<B, C> {
    pub fn with_clock(backend: B, clock: C) -> Self {
        Self {
            backend,
            clock,
            allocation: AllocationMode::default(),
            create_lock: Mutex::new(()),
        }
    }

    pub fn allocation(mut self, mode: AllocationMode) -> Self {
        self.allocation = mode;
        self
    }

    pub fn allocation_mode(&self) -> AllocationMode {
        self.allocation
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// All stored entries, in backend order
    pub async fn get_all(&self) -> Result<Vec<Entry>, StoreError> {
        self.backend.list().await
    }

    pub async fn get_by_id(&self, id: &EntryId) -> Result<Entry, StoreError> {
        self.backend.get(id).await
    }

    /// Persist a new entry with a freshly allocated serial
    pub async fn create(&self, draft: EntryDraft) -> Result<Entry, StoreError> {
        let _guard = match self.allocation {
            AllocationMode::Serialized => Some(self.create_lock.lock().await),
            AllocationMode::Unsynchronized => None,
        };
        let entry = self.backend.create(draft, self.clock.now()).await?;
        tracing::debug!(id = %entry.id, serial = entry.serial_number, "created");
        Ok(entry)
    }

    /// Merge `patch` onto an existing entry and return the stored result
    pub async fn update(&self, id: &EntryId, patch: EntryPatch) -> Result<Entry, StoreError> {
        patch.validate()?;
        self.backend.update(id, &patch, self.clock.now()).await
    }

    pub async fn delete(&self, id: &EntryId) -> Result<(), StoreError> {
        self.backend.delete(id).await
    }

    /// True if a stored entry already uses `username` on `website`.
    ///
    /// Advisory only; `create` does not consult it.
    pub async fn check_username(&self, username: &str, website: &str) -> Result<bool, StoreError> {
        self.backend.exists(username, website).await
    }

    /// Entries filtered and sorted for the dashboard
    pub async fn query(&self, query: &EntryQuery) -> Result<Vec<Entry>, StoreError> {
        Ok(query.apply(self.get_all().await?))
    }
}

impl<B, C> std::fmt::Debug for EntryStore<B, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EntryStore")
            .field("allocation", &self.allocation)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
