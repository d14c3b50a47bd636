// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Dashboard search and sort over entry lists
//!
//! Stores return entries in no particular order. Consumers that display a
//! list build an [`EntryQuery`] and apply it to whatever the store returned.

use crate::entry::Entry;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Field to order entries by
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    #[default]
    SerialNumber,
    Name,
    Website,
    CreatedAt,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

/// Search term plus ordering
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryQuery {
    pub search: Option<String>,
    pub sort: SortField,
    pub direction: SortDirection,
}

impl EntryQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep only entries matching `term` (blank terms match everything)
    pub fn search(mut self, term: impl Into<String>) -> Self {
        let term = term.into();
        self.search = if term.trim().is_empty() {
            None
        } else {
            Some(term)
        };
        self
    }

    pub fn sort_by(mut self, field: SortField) -> Self {
        self.sort = field;
        self
    }

    pub fn direction(mut self, direction: SortDirection) -> Self {
        self.direction = direction;
        self
    }

    /// Case-insensitive substring match over name, username, website and
    /// the decimal serial number
    pub fn matches(&self, entry: &Entry) -> bool {
        let Some(term) = &self.search else {
            return true;
        };
        let term = term.to_lowercase();
        entry.name.to_lowercase().contains(&term)
            || entry.username.to_lowercase().contains(&term)
            || entry.website.to_lowercase().contains(&term)
            || entry.serial_number.to_string().contains(&term)
    }

    /// Filter then sort. The sort is stable, so ties keep store order.
    pub fn apply(&self, entries: Vec<Entry>) -> Vec<Entry> {
        let mut selected: Vec<Entry> = entries.into_iter().filter(|e| self.matches(e)).collect();
        selected.sort_by(|a, b| {
            let ordering = self.compare(a, b);
            match self.direction {
                SortDirection::Ascending => ordering,
                SortDirection::Descending => ordering.reverse(),
            }
        });
        selected
    }

    fn compare(&self, a: &Entry, b: &Entry) -> Ordering {
        match self.sort {
            SortField::SerialNumber => a.serial_number.cmp(&b.serial_number),
            SortField::Name => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
            SortField::Website => a.website.to_lowercase().cmp(&b.website.to_lowercase()),
            SortField::CreatedAt => a.created_at.cmp(&b.created_at),
        }
    }
}

#[cfg(test)]
#[path = "query_tests.rs"]
mod tests;
