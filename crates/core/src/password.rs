// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Random passwords for new entries

use rand::Rng;

/// Letters, digits and the shifted digit-row symbols
pub const PASSWORD_CHARSET: &[u8] =
    b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789!@#$%^&*()_+";

pub const DEFAULT_PASSWORD_LENGTH: usize = 12;

/// Generate a password of `length` characters from [`PASSWORD_CHARSET`]
pub fn generate_password(length: usize) -> String {
    generate_password_with(&mut rand::thread_rng(), length)
}

/// Same as [`generate_password`], drawing from the given RNG
pub fn generate_password_with<R: Rng>(rng: &mut R, length: usize) -> String {
    (0..length)
        .map(|_| PASSWORD_CHARSET[rng.gen_range(0..PASSWORD_CHARSET.len())] as char)
        .collect()
}
