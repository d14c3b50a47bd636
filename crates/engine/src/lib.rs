// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Keybook entry facade and uniqueness validation

mod store;
mod validator;

pub use kb_adapters::StoreError;
pub use store::{AllocationMode, EntryStore};
pub use validator::{UniquenessValidator, UsernameStatus, ValidationFailure, DEFAULT_WINDOW};
