// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake document-store proxy for testing
//!
//! Interprets the same JSON bodies the HTTP proxy would send, against an
//! in-process collection. Each call yields once before it is handled, so
//! concurrent callers interleave the way they would over a network.
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{Action, DocumentProxy, ProxyError};
use async_trait::async_trait;
use kb_core::{IdGen, SequentialIdGen};
use serde_json::{json, Map, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

/// Recorded proxy call
#[derive(Debug, Clone, PartialEq)]
pub struct ProxyCall {
    pub action: Action,
    pub body: Value,
}

#[derive(Default)]
struct FakeStoreState {
    documents: Vec<Map<String, Value>>,
    calls: Vec<ProxyCall>,
    failures: HashMap<Action, ProxyError>,
}

/// In-process document store speaking the proxy protocol
#[derive(Clone)]
pub struct FakeDocumentProxy {
    state: Arc<Mutex<FakeStoreState>>,
    ids: SequentialIdGen,
}

impl Default for FakeDocumentProxy {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeDocumentProxy {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(FakeStoreState::default())),
            ids: SequentialIdGen::new("doc"),
        }
    }

    /// Get all recorded calls
    pub fn calls(&self) -> Vec<ProxyCall> {
        self.lock().calls.clone()
    }

    /// Actions of all recorded calls, in order
    pub fn actions(&self) -> Vec<Action> {
        self.lock().calls.iter().map(|c| c.action).collect()
    }

    /// Clear recorded calls
    pub fn clear_calls(&self) {
        self.lock().calls.clear();
    }

    /// Raw stored documents
    pub fn documents(&self) -> Vec<Value> {
        self.lock()
            .documents
            .iter()
            .cloned()
            .map(Value::Object)
            .collect()
    }

    /// Insert a raw document as-is (must carry its own `_id`)
    pub fn insert_raw(&self, document: Value) {
        if let Value::Object(map) = document {
            self.lock().documents.push(map);
        }
    }

    /// Make the next call to `action` fail with `error`
    pub fn fail_next(&self, action: Action, error: ProxyError) {
        self.lock().failures.insert(action, error);
    }

    fn lock(&self) -> MutexGuard<'_, FakeStoreState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn handle(&self, action: Action, body: &Value) -> Result<Value, ProxyError> {
        let mut state = self.lock();
        state.calls.push(ProxyCall {
            action,
            body: body.clone(),
        });
        if let Some(error) = state.failures.remove(&action) {
            return Err(error);
        }

        for key in ["database", "collection"] {
            if !body.get(key).is_some_and(Value::is_string) {
                return Err(bad_request(format!("missing {}", key)));
            }
        }

        let filter = body.get("filter").cloned().unwrap_or_else(|| json!({}));
        let documents = &mut state.documents;

        match action {
            Action::Find => {
                let matched: Vec<Value> = documents
                    .iter()
                    .filter(|d| matches_filter(d, &filter))
                    .cloned()
                    .map(Value::Object)
                    .collect();
                Ok(json!({ "documents": matched }))
            }
            Action::FindOne => {
                let found = documents
                    .iter()
                    .find(|d| matches_filter(d, &filter))
                    .cloned()
                    .map(Value::Object)
                    .unwrap_or(Value::Null);
                Ok(json!({ "document": found }))
            }
            Action::Aggregate => {
                if documents.is_empty() {
                    return Ok(json!({ "documents": [] }));
                }
                let max = documents
                    .iter()
                    .filter_map(|d| d.get("serialNumber").and_then(Value::as_u64))
                    .max();
                Ok(json!({ "documents": [{ "_id": null, "maxSerial": max }] }))
            }
            Action::InsertOne => {
                let Some(Value::Object(mut document)) = body.get("document").cloned() else {
                    return Err(bad_request("missing document"));
                };
                let id = self.ids.next_id().0;
                document.insert("_id".to_string(), Value::String(id.clone()));
                documents.push(document);
                Ok(json!({ "insertedId": id }))
            }
            Action::UpdateOne => {
                let Some(Value::Object(set)) = body.pointer("/update/$set").cloned() else {
                    return Err(bad_request("missing update.$set"));
                };
                match documents.iter_mut().find(|d| matches_filter(d, &filter)) {
                    Some(document) => {
                        document.extend(set);
                        Ok(json!({ "matchedCount": 1, "modifiedCount": 1 }))
                    }
                    None => Ok(json!({ "matchedCount": 0, "modifiedCount": 0 })),
                }
            }
            Action::DeleteOne => {
                match documents.iter().position(|d| matches_filter(d, &filter)) {
                    Some(index) => {
                        documents.remove(index);
                        Ok(json!({ "deletedCount": 1 }))
                    }
                    None => Ok(json!({ "deletedCount": 0 })),
                }
            }
        }
    }
}

#[async_trait]
impl DocumentProxy for FakeDocumentProxy {
    async fn call(&self, action: Action, body: Value) -> Result<Value, ProxyError> {
        tokio::task::yield_now().await;
        self.handle(action, &body)
    }
}

fn bad_request(message: impl Into<String>) -> ProxyError {
    ProxyError::Status {
        status: 400,
        message: message.into(),
    }
}

/// Supports equality, `{"$oid": ..}` and `{"$regex": .., "$options": ..}`
fn matches_filter(document: &Map<String, Value>, filter: &Value) -> bool {
    let Some(conditions) = filter.as_object() else {
        return false;
    };
    conditions.iter().all(|(field, condition)| {
        let value = document.get(field);
        if let Some(oid) = condition.get("$oid") {
            return value == Some(oid);
        }
        if let Some(pattern) = condition.get("$regex").and_then(Value::as_str) {
            let options = condition
                .get("$options")
                .and_then(Value::as_str)
                .unwrap_or("");
            let Ok(regex) = regex::RegexBuilder::new(pattern)
                .case_insensitive(options.contains('i'))
                .build()
            else {
                return false;
            };
            return value
                .and_then(Value::as_str)
                .is_some_and(|text| regex.is_match(text));
        }
        value == Some(condition)
    })
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
