// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Remote entry backend over the document-store proxy
//!
//! `create` reads the current maximum serial and inserts in two separate
//! round trips. Two creates that interleave between those calls receive
//! the same serial; callers that need distinct serials must serialize
//! creates themselves.

use super::{EntryBackend, StoreError};
use crate::proxy::wire::{
    self, AggregateRequest, AggregateResponse, DeleteResponse, FilterRequest, FindOneResponse,
    FindResponse, InsertRequest, InsertResponse, PatchDocument, SetOperation, UpdateRequest,
    UpdateResponse,
};
use crate::proxy::{Action, DocumentProxy, Namespace};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use kb_core::{serial, Entry, EntryDraft, EntryId, EntryPatch};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Entry store backed by a remote document collection
#[derive(Debug, Clone)]
pub struct RemoteBackend<P> {
    proxy: P,
    namespace: Namespace,
}

impl<P: DocumentProxy> RemoteBackend<P> {
    pub fn new(proxy: P, namespace: Namespace) -> Self {
        Self { proxy, namespace }
    }

    pub fn proxy(&self) -> &P {
        &self.proxy
    }

    pub fn namespace(&self) -> &Namespace {
        &self.namespace
    }

    async fn send<Req, Resp>(&self, action: Action, request: &Req) -> Result<Resp, StoreError>
    where
        Req: Serialize + Sync,
        Resp: DeserializeOwned,
    {
        let body = wire::encode(request)?;
        let response = self.proxy.call(action, body).await?;
        Ok(wire::decode(response)?)
    }

    async fn find_one(&self, filter: serde_json::Value) -> Result<Option<Entry>, StoreError> {
        let response: FindOneResponse = self
            .send(
                Action::FindOne,
                &FilterRequest {
                    namespace: &self.namespace,
                    filter,
                },
            )
            .await?;
        Ok(response.document)
    }

    async fn max_serial(&self) -> Result<Option<u64>, StoreError> {
        let response: AggregateResponse = self
            .send(
                Action::Aggregate,
                &AggregateRequest {
                    namespace: &self.namespace,
                    pipeline: wire::max_serial_pipeline(),
                },
            )
            .await?;
        Ok(response.max_serial())
    }
}

#[async_trait]
impl<P: DocumentProxy> EntryBackend for RemoteBackend<P> {
    async fn list(&self) -> Result<Vec<Entry>, StoreError> {
        let response: FindResponse = self
            .send(
                Action::Find,
                &FilterRequest {
                    namespace: &self.namespace,
                    filter: serde_json::json!({}),
                },
            )
            .await?;
        Ok(response.documents)
    }

    async fn get(&self, id: &EntryId) -> Result<Entry, StoreError> {
        self.find_one(wire::id_filter(id))
            .await?
            .ok_or_else(|| StoreError::NotFound(id.clone()))
    }

    async fn create(&self, draft: EntryDraft, now: DateTime<Utc>) -> Result<Entry, StoreError> {
        let next = serial::next_after(self.max_serial().await?);
        let document = draft.stamp(next, now);

        let response: InsertResponse = self
            .send(
                Action::InsertOne,
                &InsertRequest {
                    namespace: &self.namespace,
                    document: &document,
                },
            )
            .await?;

        tracing::debug!(id = %response.inserted_id, serial = next, "inserted entry");
        Ok(document.with_id(EntryId(response.inserted_id)))
    }

    async fn update(
        &self,
        id: &EntryId,
        patch: &EntryPatch,
        now: DateTime<Utc>,
    ) -> Result<Entry, StoreError> {
        let response: UpdateResponse = self
            .send(
                Action::UpdateOne,
                &UpdateRequest {
                    namespace: &self.namespace,
                    filter: wire::id_filter(id),
                    update: SetOperation {
                        set: PatchDocument {
                            patch,
                            updated_at: now,
                        },
                    },
                },
            )
            .await?;
        tracing::debug!(%id, modified = response.modified_count, "updated entry");

        // Re-read so the caller sees exactly what was stored
        self.get(id).await
    }

    async fn delete(&self, id: &EntryId) -> Result<(), StoreError> {
        let response: DeleteResponse = self
            .send(
                Action::DeleteOne,
                &FilterRequest {
                    namespace: &self.namespace,
                    filter: wire::id_filter(id),
                },
            )
            .await?;
        if response.deleted_count == 0 {
            return Err(StoreError::NotFound(id.clone()));
        }
        Ok(())
    }

    async fn exists(&self, username: &str, website: &str) -> Result<bool, StoreError> {
        let found = self
            .find_one(wire::credential_filter(username, website))
            .await?;
        Ok(found.is_some())
    }
}

#[cfg(test)]
#[path = "remote_tests.rs"]
mod tests;
