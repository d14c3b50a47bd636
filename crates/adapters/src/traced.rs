// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Traced backend wrapper for consistent observability
//!
//! Credentials never reach the logs: only ids, serials, websites and
//! usernames are recorded.

use crate::store::{EntryBackend, StoreError};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use kb_core::{Entry, EntryDraft, EntryId, EntryPatch};
use std::time::Instant;
use tracing::Instrument;

/// Wrapper that adds tracing to any EntryBackend
#[derive(Clone)]
pub struct TracedBackend<B> {
    inner: B,
}

impl<B> TracedBackend<B> {
    pub fn new(inner: B) -> Self {
        Self { inner }
    }

    pub fn inner(&self) -> &B {
        &self.inner
    }
}

fn elapsed_ms(start: Instant) -> u64 {
    start.elapsed().as_millis() as u64
}

#[async_trait]
impl<B: EntryBackend> EntryBackend for TracedBackend<B> {
    async fn list(&self) -> Result<Vec<Entry>, StoreError> {
        let span = tracing::info_span!("store.list");
        async {
            let start = Instant::now();
            let result = self.inner.list().await;
            match &result {
                Ok(entries) => tracing::debug!(
                    count = entries.len(),
                    elapsed_ms = elapsed_ms(start),
                    "listed entries"
                ),
                Err(e) => tracing::error!(elapsed_ms = elapsed_ms(start), error = %e, "list failed"),
            }
            result
        }
        .instrument(span)
        .await
    }

    async fn get(&self, id: &EntryId) -> Result<Entry, StoreError> {
        let span = tracing::info_span!("store.get", %id);
        async {
            let result = self.inner.get(id).await;
            match &result {
                Ok(entry) => tracing::trace!(serial = entry.serial_number, "fetched"),
                // Missing ids are a caller concern, not a backend fault
                Err(e) if e.is_not_found() => tracing::debug!("not found"),
                Err(e) => tracing::error!(error = %e, "get failed"),
            }
            result
        }
        .instrument(span)
        .await
    }

    async fn create(&self, draft: EntryDraft, now: DateTime<Utc>) -> Result<Entry, StoreError> {
        let span = tracing::info_span!("store.create", website = draft.website());
        async {
            let start = Instant::now();
            let result = self.inner.create(draft, now).await;
            match &result {
                Ok(entry) => tracing::info!(
                    id = %entry.id,
                    serial = entry.serial_number,
                    elapsed_ms = elapsed_ms(start),
                    "entry created"
                ),
                Err(e) => {
                    tracing::error!(elapsed_ms = elapsed_ms(start), error = %e, "create failed")
                }
            }
            result
        }
        .instrument(span)
        .await
    }

    async fn update(
        &self,
        id: &EntryId,
        patch: &EntryPatch,
        now: DateTime<Utc>,
    ) -> Result<Entry, StoreError> {
        let span = tracing::info_span!("store.update", %id);
        async {
            let start = Instant::now();
            let result = self.inner.update(id, patch, now).await;
            match &result {
                Ok(_) => tracing::info!(elapsed_ms = elapsed_ms(start), "entry updated"),
                Err(e) if e.is_not_found() => tracing::warn!("update target missing"),
                Err(e) => {
                    tracing::error!(elapsed_ms = elapsed_ms(start), error = %e, "update failed")
                }
            }
            result
        }
        .instrument(span)
        .await
    }

    async fn delete(&self, id: &EntryId) -> Result<(), StoreError> {
        let span = tracing::info_span!("store.delete", %id);
        async {
            let result = self.inner.delete(id).await;
            match &result {
                Ok(()) => tracing::info!("entry deleted"),
                Err(e) if e.is_not_found() => tracing::warn!("delete target missing"),
                Err(e) => tracing::error!(error = %e, "delete failed"),
            }
            result
        }
        .instrument(span)
        .await
    }

    async fn exists(&self, username: &str, website: &str) -> Result<bool, StoreError> {
        let span = tracing::info_span!("store.exists", username, website);
        async {
            let result = self.inner.exists(username, website).await;
            match &result {
                Ok(found) => tracing::debug!(found, "checked credential"),
                Err(e) => tracing::error!(error = %e, "check failed"),
            }
            result
        }
        .instrument(span)
        .await
    }
}

#[cfg(test)]
#[path = "traced_tests.rs"]
mod tests;
