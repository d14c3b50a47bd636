// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Request and response bodies for the proxy actions

use super::{Namespace, ProxyError};
use chrono::{DateTime, Utc};
use kb_core::{Entry, EntryId, EntryPatch, NewEntry};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Filter selecting a document by id
pub fn id_filter(id: &EntryId) -> Value {
    json!({ "_id": { "$oid": id.as_str() } })
}

/// Filter for the soft uniqueness check.
///
/// Username must equal the query ignoring case; the stored website must
/// contain the query ignoring case. Both inputs are escaped so they match
/// literally.
pub fn credential_filter(username: &str, website: &str) -> Value {
    json!({
        "username": {
            "$regex": format!("^{}$", regex::escape(username)),
            "$options": "i",
        },
        "website": {
            "$regex": regex::escape(website),
            "$options": "i",
        },
    })
}

/// Pipeline grouping the whole collection into its maximum serial number
pub fn max_serial_pipeline() -> Value {
    json!([
        { "$group": { "_id": null, "maxSerial": { "$max": "$serialNumber" } } }
    ])
}

/// Body for `find`, `findOne` and `deleteOne`
#[derive(Debug, Serialize)]
pub struct FilterRequest<'a> {
    #[serde(flatten)]
    pub namespace: &'a Namespace,
    pub filter: Value,
}

#[derive(Debug, Serialize)]
pub struct AggregateRequest<'a> {
    #[serde(flatten)]
    pub namespace: &'a Namespace,
    pub pipeline: Value,
}

#[derive(Debug, Serialize)]
pub struct InsertRequest<'a> {
    #[serde(flatten)]
    pub namespace: &'a Namespace,
    pub document: &'a NewEntry,
}

#[derive(Debug, Serialize)]
pub struct UpdateRequest<'a> {
    #[serde(flatten)]
    pub namespace: &'a Namespace,
    pub filter: Value,
    pub update: SetOperation<'a>,
}

#[derive(Debug, Serialize)]
pub struct SetOperation<'a> {
    #[serde(rename = "$set")]
    pub set: PatchDocument<'a>,
}

/// Supplied patch fields plus the refreshed `updatedAt`
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PatchDocument<'a> {
    #[serde(flatten)]
    pub patch: &'a EntryPatch,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct FindResponse {
    pub documents: Vec<Entry>,
}

#[derive(Debug, Deserialize)]
pub struct FindOneResponse {
    #[serde(default)]
    pub document: Option<Entry>,
}

/// Aggregation result; an empty collection yields no rows at all
#[derive(Debug, Deserialize)]
pub struct AggregateResponse {
    #[serde(default)]
    pub documents: Vec<MaxSerialRow>,
}

impl AggregateResponse {
    pub fn max_serial(&self) -> Option<u64> {
        self.documents.first().and_then(|row| row.max_serial)
    }
}

#[derive(Debug, Deserialize)]
pub struct MaxSerialRow {
    #[serde(rename = "maxSerial", default)]
    pub max_serial: Option<u64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertResponse {
    pub inserted_id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateResponse {
    #[serde(default)]
    pub modified_count: u64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteResponse {
    pub deleted_count: u64,
}

/// Error body returned with non-2xx statuses
#[derive(Debug, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub error: Option<String>,
}

pub fn encode<T: Serialize>(request: &T) -> Result<Value, ProxyError> {
    serde_json::to_value(request).map_err(|e| ProxyError::Encode(e.to_string()))
}

pub fn decode<T: DeserializeOwned>(body: Value) -> Result<T, ProxyError> {
    serde_json::from_value(body).map_err(|e| ProxyError::Decode(e.to_string()))
}
