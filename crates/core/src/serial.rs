// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Serial number allocation
//!
//! The next serial is always derived from the entries currently visible:
//! `max(existing) + 1`, or 1 for an empty store. There is no separate
//! counter to keep in step with deletes. The read that feeds this
//! computation is not atomic with the insert that follows it; callers
//! that need unique serials must hold a lock across both.

/// Serial that follows the given maximum (`None` for an empty store)
pub fn next_after(max: Option<u64>) -> u64 {
    max.unwrap_or(0).saturating_add(1)
}

/// Serial that follows every serial in `existing`
pub fn next_serial<I>(existing: I) -> u64
where
    I: IntoIterator<Item = u64>,
{
    next_after(existing.into_iter().max())
}
