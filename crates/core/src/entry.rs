// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Credential entry value types
//!
//! An [`Entry`] is only ever produced by a backend from a validated
//! [`EntryDraft`]. Ids and serial numbers are never supplied by callers.
//! Passwords are stored and returned exactly as given.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Unique identifier for a stored entry
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntryId(pub String);

impl EntryId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for EntryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for EntryId {
    fn from(s: String) -> Self {
        EntryId(s)
    }
}

impl From<&str> for EntryId {
    fn from(s: &str) -> Self {
        EntryId(s.to_string())
    }
}

/// User-editable fields of an entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Name,
    Username,
    Password,
    Website,
    Logo,
}

impl Field {
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Name => "name",
            Field::Username => "username",
            Field::Password => "password",
            Field::Website => "website",
            Field::Logo => "logo",
        }
    }
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors from draft and patch validation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DraftError {
    #[error("{0} is required")]
    MissingField(Field),
}

/// A stored credential record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entry {
    #[serde(rename = "_id")]
    pub id: EntryId,
    pub serial_number: u64,
    pub name: String,
    pub username: String,
    pub password: String,
    pub website: String,
    #[serde(default)]
    pub logo: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A fully stamped entry that has not been assigned an id yet.
///
/// This is the document shape handed to a store's insert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewEntry {
    pub serial_number: u64,
    pub name: String,
    pub username: String,
    pub password: String,
    pub website: String,
    #[serde(default)]
    pub logo: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl NewEntry {
    /// Attach the id assigned by the store
    pub fn with_id(self, id: EntryId) -> Entry {
        Entry {
            id,
            serial_number: self.serial_number,
            name: self.name,
            username: self.username,
            password: self.password,
            website: self.website,
            logo: self.logo,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Caller-supplied content for a new entry.
///
/// Construction rejects blank required fields, so a draft that exists is
/// always safe to hand to the serial allocator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryDraft {
    name: String,
    username: String,
    password: String,
    website: String,
    logo: String,
}

impl EntryDraft {
    pub fn new(
        name: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
        website: impl Into<String>,
    ) -> Result<Self, DraftError> {
        let draft = Self {
            name: name.into(),
            username: username.into(),
            password: password.into(),
            website: website.into(),
            logo: String::new(),
        };
        require(Field::Name, &draft.name)?;
        require(Field::Username, &draft.username)?;
        require(Field::Password, &draft.password)?;
        require(Field::Website, &draft.website)?;
        Ok(draft)
    }

    /// Attach a display logo (stored verbatim)
    pub fn with_logo(mut self, logo: impl Into<String>) -> Self {
        self.logo = logo.into();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn password(&self) -> &str {
        &self.password
    }

    pub fn website(&self) -> &str {
        &self.website
    }

    pub fn logo(&self) -> &str {
        &self.logo
    }

    /// Stamp the draft with its serial number and creation time
    pub fn stamp(self, serial_number: u64, now: DateTime<Utc>) -> NewEntry {
        NewEntry {
            serial_number,
            name: self.name,
            username: self.username,
            password: self.password,
            website: self.website,
            logo: self.logo,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Partial replacement of an entry's editable fields
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,
}

impl EntryPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }

    pub fn website(mut self, website: impl Into<String>) -> Self {
        self.website = Some(website.into());
        self
    }

    pub fn logo(mut self, logo: impl Into<String>) -> Self {
        self.logo = Some(logo.into());
        self
    }

    /// True if no field is supplied
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.username.is_none()
            && self.password.is_none()
            && self.website.is_none()
            && self.logo.is_none()
    }

    /// Reject a supplied-but-blank required field
    pub fn validate(&self) -> Result<(), DraftError> {
        let required = [
            (Field::Name, &self.name),
            (Field::Username, &self.username),
            (Field::Password, &self.password),
            (Field::Website, &self.website),
        ];
        for (field, value) in required {
            if let Some(value) = value {
                require(field, value)?;
            }
        }
        Ok(())
    }

    /// Merge supplied fields onto `entry` and refresh `updated_at`
    pub fn apply(&self, entry: &mut Entry, now: DateTime<Utc>) {
        if let Some(name) = &self.name {
            entry.name = name.clone();
        }
        if let Some(username) = &self.username {
            entry.username = username.clone();
        }
        if let Some(password) = &self.password {
            entry.password = password.clone();
        }
        if let Some(website) = &self.website {
            entry.website = website.clone();
        }
        if let Some(logo) = &self.logo {
            entry.logo = logo.clone();
        }
        entry.updated_at = now;
    }
}

fn require(field: Field, value: &str) -> Result<(), DraftError> {
    if value.trim().is_empty() {
        return Err(DraftError::MissingField(field));
    }
    Ok(())
}

/// Soft uniqueness rule for `(username, website)`.
///
/// Usernames compare case-insensitively. The website matches when the
/// stored website contains the queried one, ignoring case. The containment
/// only runs in that direction: querying `www.example.com/login` does not
/// match a stored `example.com`.
pub fn matches_credential(entry: &Entry, username: &str, website: &str) -> bool {
    entry.username.to_lowercase() == username.to_lowercase()
        && entry
            .website
            .to_lowercase()
            .contains(&website.to_lowercase())
}

#[cfg(test)]
#[path = "entry_tests.rs"]
mod tests;
