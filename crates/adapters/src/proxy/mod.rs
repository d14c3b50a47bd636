// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Document-store proxy transport
//!
//! The remote backend speaks a small JSON protocol modelled on a hosted
//! document database's data API: every operation is a `POST` to
//! `{base_url}/action/{name}` whose body names the database and collection.

mod http;
pub mod wire;

pub use http::HttpDocumentProxy;

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeDocumentProxy, ProxyCall};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Database and collection holding the entries
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Namespace {
    pub database: String,
    pub collection: String,
}

impl Namespace {
    pub fn new(database: impl Into<String>, collection: impl Into<String>) -> Self {
        Self {
            database: database.into(),
            collection: collection.into(),
        }
    }
}

/// Proxy endpoints
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Find,
    FindOne,
    Aggregate,
    InsertOne,
    UpdateOne,
    DeleteOne,
}

impl Action {
    /// Path segment under `/action/`
    pub fn name(&self) -> &'static str {
        match self {
            Action::Find => "find",
            Action::FindOne => "findOne",
            Action::Aggregate => "aggregate",
            Action::InsertOne => "insertOne",
            Action::UpdateOne => "updateOne",
            Action::DeleteOne => "deleteOne",
        }
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Errors from the proxy transport
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProxyError {
    /// Non-2xx response; `message` is the server's `error` field or the
    /// status reason phrase
    #[error("{message}")]
    Status { status: u16, message: String },
    #[error("transport error: {0}")]
    Transport(String),
    #[error("failed to encode request: {0}")]
    Encode(String),
    #[error("failed to decode response: {0}")]
    Decode(String),
}

/// Sends one action to the document store and returns the decoded JSON body
#[async_trait]
pub trait DocumentProxy: Clone + Send + Sync + 'static {
    async fn call(
        &self,
        action: Action,
        body: serde_json::Value,
    ) -> Result<serde_json::Value, ProxyError>;
}
