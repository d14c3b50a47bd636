// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Entry id allocation
//!
//! Backends that assign ids themselves draw them from an [`IdGen`]. An id
//! freed by a delete is never handed out again.

use crate::entry::EntryId;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Source of fresh entry ids
pub trait IdGen: Clone + Send + Sync {
    fn next_id(&self) -> EntryId;
}

/// Random ids (UUID v4, hyphenless) for production use
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidIdGen;

impl IdGen for UuidIdGen {
    fn next_id(&self) -> EntryId {
        EntryId(uuid::Uuid::new_v4().simple().to_string())
    }
}

/// `prefix-1`, `prefix-2`, ... for deterministic tests.
///
/// Clones share one counter.
#[derive(Debug, Clone)]
pub struct SequentialIdGen {
    prefix: Arc<str>,
    issued: Arc<AtomicU64>,
}

impl SequentialIdGen {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: Arc::from(prefix.into()),
            issued: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Number of ids handed out so far
    pub fn issued(&self) -> u64 {
        self.issued.load(Ordering::SeqCst)
    }
}

impl Default for SequentialIdGen {
    fn default() -> Self {
        Self::new("entry")
    }
}

impl IdGen for SequentialIdGen {
    fn next_id(&self) -> EntryId {
        let n = self.issued.fetch_add(1, Ordering::SeqCst) + 1;
        EntryId(format!("{}-{}", self.prefix, n))
    }
}

#[cfg(test)]
#[path = "id_tests.rs"]
mod tests;
