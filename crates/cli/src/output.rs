// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Output formatting for CLI commands

use chrono::SecondsFormat;
use clap::ValueEnum;
use kb_core::Entry;
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Print output in the specified format
pub fn print<T: Serialize + fmt::Display>(value: &T, format: OutputFormat) {
    match format {
        OutputFormat::Text => println!("{}", value),
        OutputFormat::Json => {
            if let Ok(json) = serde_json::to_string_pretty(value) {
                println!("{}", json);
            }
        }
    }
}

/// Print a list of items
pub fn print_list<T: Serialize + fmt::Display>(items: &[T], format: OutputFormat) {
    match format {
        OutputFormat::Text => {
            for item in items {
                println!("{}", item);
            }
        }
        OutputFormat::Json => {
            if let Ok(json) = serde_json::to_string_pretty(items) {
                println!("{}", json);
            }
        }
    }
}

const MASK: &str = "********";

/// Entry as shown to the user, password masked unless revealed
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryView {
    pub id: String,
    pub serial_number: u64,
    pub name: String,
    pub username: String,
    pub password: String,
    pub website: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub logo: String,
    pub created_at: String,
    pub updated_at: String,
}

impl EntryView {
    pub fn new(entry: Entry, reveal: bool) -> Self {
        Self {
            id: entry.id.0,
            serial_number: entry.serial_number,
            name: entry.name,
            username: entry.username,
            password: if reveal {
                entry.password
            } else {
                MASK.to_string()
            },
            website: entry.website,
            logo: entry.logo,
            created_at: entry.created_at.to_rfc3339_opts(SecondsFormat::Secs, true),
            updated_at: entry.updated_at.to_rfc3339_opts(SecondsFormat::Secs, true),
        }
    }
}

/// One table row per entry
impl fmt::Display for EntryView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:>4}  {:<24} {:<20} {:<28} {}",
            self.serial_number,
            truncate(&self.name, 24),
            truncate(&self.username, 20),
            truncate(&self.website, 28),
            self.id
        )
    }
}

/// Multi-line detail view of a single entry
#[derive(Debug, Serialize)]
#[serde(transparent)]
pub struct EntryDetail(pub EntryView);

impl fmt::Display for EntryDetail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let view = &self.0;
        writeln!(f, "Entry: {}", view.id)?;
        writeln!(f, "  Serial: {}", view.serial_number)?;
        writeln!(f, "  Name: {}", view.name)?;
        writeln!(f, "  Username: {}", view.username)?;
        writeln!(f, "  Password: {}", view.password)?;
        writeln!(f, "  Website: {}", view.website)?;
        if !view.logo.is_empty() {
            writeln!(f, "  Logo: {}", view.logo)?;
        }
        writeln!(f, "  Created: {}", view.created_at)?;
        write!(f, "  Updated: {}", view.updated_at)
    }
}

pub fn list_header() -> String {
    format!(
        "{:>4}  {:<24} {:<20} {:<28} ID",
        "#", "NAME", "USERNAME", "WEBSITE"
    )
}

fn truncate(value: &str, width: usize) -> String {
    if value.chars().count() <= width {
        return value.to_string();
    }
    let mut cut: String = value.chars().take(width.saturating_sub(1)).collect();
    cut.push('~');
    cut
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use kb_core::EntryId;

    fn entry() -> Entry {
        let now = Utc.with_ymd_and_hms(2026, 3, 4, 5, 6, 7).unwrap();
        Entry {
            id: EntryId::from("abc"),
            serial_number: 7,
            name: "GitHub".into(),
            username: "octocat".into(),
            password: "hunter2".into(),
            website: "github.com".into(),
            logo: String::new(),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn password_is_masked_by_default() {
        let view = EntryView::new(entry(), false);
        assert_eq!(view.password, MASK);
        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["password"], MASK);
        assert!(json.get("logo").is_none());
    }

    #[test]
    fn reveal_shows_password() {
        let detail = EntryDetail(EntryView::new(entry(), true));
        let text = detail.to_string();
        assert!(text.contains("Password: hunter2"));
        assert!(text.contains("Created: 2026-03-04T05:06:07Z"));
    }

    #[test]
    fn row_contains_serial_and_id() {
        let row = EntryView::new(entry(), false).to_string();
        assert!(row.starts_with("   7  GitHub"));
        assert!(row.ends_with("abc"));
    }

    #[test]
    fn long_values_are_truncated() {
        assert_eq!(truncate("abcdef", 4), "abc~");
        assert_eq!(truncate("abc", 4), "abc");
    }
}
