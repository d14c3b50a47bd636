// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Debounced, advisory uniqueness check for `(username, website)`
//!
//! Each keystroke-level [`UniquenessValidator::input`] supersedes the
//! previous one. Only an input followed by a quiet window reaches the
//! store, and only the newest input may publish a result.

use crate::store::EntryStore;
use kb_adapters::{EntryBackend, StoreError};
use kb_core::{Clock, Debouncer, SystemClock};
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::watch;

/// Quiet period before a check runs
pub const DEFAULT_WINDOW: Duration = Duration::from_millis(500);

/// Field-level failure shown next to the username
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationFailure {
    #[error("Username already exists for {website}")]
    UsernameTaken { username: String, website: String },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum UsernameStatus {
    /// Nothing checked, or the input was incomplete
    #[default]
    Idle,
    Checking,
    Available,
    Taken(ValidationFailure),
    /// The lookup itself failed; the field is left without an error
    Failed(String),
}

impl UsernameStatus {
    pub fn failure(&self) -> Option<&ValidationFailure> {
        match self {
            UsernameStatus::Taken(failure) => Some(failure),
            _ => None,
        }
    }
}

pub struct UniquenessValidator<B, C = SystemClock> {
    store: Arc<EntryStore<B, C>>,
    debouncer: Debouncer,
    status: Arc<watch::Sender<UsernameStatus>>,
    generation: Arc<AtomicU64>,
    editing: bool,
}

impl<B, C> UniquenessValidator<B, C>
where
    B: EntryBackend,
    C: Clock + 'static,
{
    pub fn new(store: Arc<EntryStore<B, C>>) -> Self {
        Self::with_window(store, DEFAULT_WINDOW)
    }

    pub fn with_window(store: Arc<EntryStore<B, C>>, window: Duration) -> Self {
        let (status, _) = watch::channel(UsernameStatus::Idle);
        Self {
            store,
            debouncer: Debouncer::new(window),
            status: Arc::new(status),
            generation: Arc::new(AtomicU64::new(0)),
            editing: false,
        }
    }

    /// Validator for editing an existing entry: collisions are looked up
    /// but never reported, since the entry matches itself
    pub fn for_edit(mut self) -> Self {
        self.editing = true;
        self
    }

    pub fn window(&self) -> Duration {
        self.debouncer.window()
    }

    /// Record the latest field values and schedule a check
    pub fn input(&self, username: &str, website: &str) {
        let generation = self.bump();
        if is_blank(username) || is_blank(website) {
            self.debouncer.cancel();
            self.status.send_replace(UsernameStatus::Idle);
            return;
        }
        let task = self.check_task(generation, username.to_string(), website.to_string());
        self.debouncer.schedule(task);
    }

    /// Check immediately, bypassing the quiet window, and publish the result
    pub async fn check_now(&self, username: &str, website: &str) -> UsernameStatus {
        let generation = self.bump();
        self.debouncer.cancel();
        if is_blank(username) || is_blank(website) {
            self.status.send_replace(UsernameStatus::Idle);
            return UsernameStatus::Idle;
        }
        self.check_task(generation, username.to_string(), website.to_string())
            .await;
        self.status()
    }

    /// Drop any pending or in-flight check. Returns true if a check was
    /// still waiting out its window.
    pub fn cancel(&self) -> bool {
        self.bump();
        let waiting = self.debouncer.cancel();
        self.status.send_if_modified(|status| {
            if *status == UsernameStatus::Checking {
                *status = UsernameStatus::Idle;
                true
            } else {
                false
            }
        });
        waiting
    }

    /// True while a check is waiting out its window
    pub fn is_pending(&self) -> bool {
        self.debouncer.is_pending()
    }

    pub fn status(&self) -> UsernameStatus {
        self.status.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<UsernameStatus> {
        self.status.subscribe()
    }

    /// Current field-level error, if any
    pub fn error(&self) -> Option<ValidationFailure> {
        self.status.borrow().failure().cloned()
    }

    fn bump(&self) -> u64 {
        self.generation.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn check_task(
        &self,
        generation: u64,
        username: String,
        website: String,
    ) -> impl Future<Output = ()> + Send + 'static {
        let store = Arc::clone(&self.store);
        let status = Arc::clone(&self.status);
        let current = Arc::clone(&self.generation);
        let editing = self.editing;

        async move {
            if current.load(Ordering::SeqCst) != generation {
                return;
            }
            status.send_replace(UsernameStatus::Checking);

            let result = store.check_username(&username, &website).await;
            if current.load(Ordering::SeqCst) != generation {
                tracing::trace!(generation, "discarding stale username check");
                return;
            }
            status.send_replace(resolve(result, editing, username, website));
        }
    }
}

fn resolve(
    result: Result<bool, StoreError>,
    editing: bool,
    username: String,
    website: String,
) -> UsernameStatus {
    match result {
        Ok(true) if !editing => {
            UsernameStatus::Taken(ValidationFailure::UsernameTaken { username, website })
        }
        Ok(_) => UsernameStatus::Available,
        Err(e) => {
            tracing::warn!(error = %e, "username check failed");
            UsernameStatus::Failed(e.to_string())
        }
    }
}

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

impl<B, C> std::fmt::Debug for UniquenessValidator<B, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UniquenessValidator")
            .field("debouncer", &self.debouncer)
            .field("status", &*self.status.borrow())
            .field("editing", &self.editing)
            .finish()
    }
}

#[cfg(test)]
#[path = "validator_tests.rs"]
mod tests;
