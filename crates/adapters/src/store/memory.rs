// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-memory entry backend
//!
//! Entries live in an ordered `Vec` owned by the backend instance and
//! disappear with the process. Clones share the same entries.

use super::{EntryBackend, StoreError};
use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, Utc};
use kb_core::{
    matches_credential, serial, Entry, EntryDraft, EntryId, EntryPatch, IdGen, UuidIdGen,
};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

/// Process-lifetime entry store
#[derive(Clone)]
pub struct InMemoryBackend<I = UuidIdGen> {
    entries: Arc<Mutex<Vec<Entry>>>,
    ids: I,
    latency: Duration,
}

impl InMemoryBackend<UuidIdGen> {
    pub fn new() -> Self {
        Self::with_id_gen(UuidIdGen)
    }
}

impl Default for InMemoryBackend<UuidIdGen> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I: IdGen> InMemoryBackend<I> {
    pub fn with_id_gen(ids: I) -> Self {
        Self {
            entries: Arc::new(Mutex::new(Vec::new())),
            ids,
            latency: Duration::ZERO,
        }
    }

    /// Delay every operation by `latency` to model a network round trip
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Seed the store with existing entries (appended in order)
    pub fn with_entries(self, entries: impl IntoIterator<Item = Entry>) -> Self {
        self.lock().extend(entries);
        self
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Entry>> {
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }

    async fn simulate_latency(&self) {
        if self.latency.is_zero() {
            tokio::task::yield_now().await;
        } else {
            tokio::time::sleep(self.latency).await;
        }
    }
}

#[async_trait]
impl<I: IdGen + 'static> EntryBackend for InMemoryBackend<I> {
    async fn list(&self) -> Result<Vec<Entry>, StoreError> {
        self.simulate_latency().await;
        Ok(self.lock().clone())
    }

    async fn get(&self, id: &EntryId) -> Result<Entry, StoreError> {
        self.simulate_latency().await;
        self.lock()
            .iter()
            .find(|e| &e.id == id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(id.clone()))
    }

    async fn create(&self, draft: EntryDraft, now: DateTime<Utc>) -> Result<Entry, StoreError> {
        self.simulate_latency().await;

        // Allocation and append share one critical section, so concurrent
        // creates on this backend never observe the same maximum.
        let mut entries = self.lock();
        let next = serial::next_serial(entries.iter().map(|e| e.serial_number));
        let id = self.ids.next_id();
        if entries.iter().any(|e| e.id == id) {
            return Err(StoreError::Internal(format!("id generator reissued {}", id)));
        }

        let entry = draft.stamp(next, now).with_id(id);
        entries.push(entry.clone());
        Ok(entry)
    }

    async fn update(
        &self,
        id: &EntryId,
        patch: &EntryPatch,
        now: DateTime<Utc>,
    ) -> Result<Entry, StoreError> {
        self.simulate_latency().await;
        let mut entries = self.lock();
        let entry = entries
            .iter_mut()
            .find(|e| &e.id == id)
            .ok_or_else(|| StoreError::NotFound(id.clone()))?;
        patch.apply(entry, now);
        Ok(entry.clone())
    }

    async fn delete(&self, id: &EntryId) -> Result<(), StoreError> {
        self.simulate_latency().await;
        let mut entries = self.lock();
        let index = entries
            .iter()
            .position(|e| &e.id == id)
            .ok_or_else(|| StoreError::NotFound(id.clone()))?;
        entries.remove(index);
        Ok(())
    }

    async fn exists(&self, username: &str, website: &str) -> Result<bool, StoreError> {
        self.simulate_latency().await;
        Ok(self
            .lock()
            .iter()
            .any(|e| matches_credential(e, username, website)))
    }
}

/// Demo entries for a fresh in-memory store
///
/// Five accounts alternating between github.com and twitter.com, each one
/// day older than the last.
pub fn sample_entries(now: DateTime<Utc>) -> Vec<Entry> {
    (1..=5u64)
        .map(|n| {
            let website = if n % 2 == 1 { "github.com" } else { "twitter.com" };
            Entry {
                id: EntryId(format!("sample-{}", n)),
                serial_number: n,
                name: format!("Sample Account {}", n),
                username: format!("user{}", n),
                password: format!("password{}", n),
                website: website.to_string(),
                logo: format!("https://www.google.com/s2/favicons?domain={}&sz=128", website),
                created_at: now - TimeDelta::days(n as i64 - 1),
                updated_at: now,
            }
        })
        .collect()
}

#[cfg(test)]
#[path = "memory_tests.rs"]
mod tests;
