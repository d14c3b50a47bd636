// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! User-friendly error display with context and suggestions.
//!
//! This module provides enhanced error types that include:
//! - What went wrong (message)
//! - Why it might have happened (context)
//! - How to fix it (suggestions)

use crate::config::ConfigError;
use kb_engine::StoreError;
use std::fmt;

/// Error with context and recovery suggestions for user-friendly display.
#[derive(Debug)]
pub struct CliError {
    /// What went wrong
    pub message: String,
    /// Why it might have happened
    pub context: Vec<String>,
    /// How to fix it
    pub suggestions: Vec<String>,
    /// Original error if any
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl CliError {
    /// Create a new error with the given message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            context: Vec::new(),
            suggestions: Vec::new(),
            source: None,
        }
    }

    /// Add context about why this error might have happened.
    pub fn with_context(mut self, ctx: impl Into<String>) -> Self {
        self.context.push(ctx.into());
        self
    }

    /// Add a suggestion for how to fix this error.
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestions.push(suggestion.into());
        self
    }

    /// Set the source error that caused this error.
    pub fn with_source<E: std::error::Error + Send + Sync + 'static>(mut self, source: E) -> Self {
        self.source = Some(Box::new(source));
        self
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "error: {}", self.message)?;

        if !self.context.is_empty() {
            writeln!(f)?;
            for ctx in &self.context {
                writeln!(f, "  -> {}", ctx)?;
            }
        }

        if !self.suggestions.is_empty() {
            writeln!(f)?;
            writeln!(f, "suggestions:")?;
            for (i, suggestion) in self.suggestions.iter().enumerate() {
                writeln!(f, "  {}. {}", i + 1, suggestion)?;
            }
        }

        Ok(())
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn std::error::Error + 'static))
    }
}

/// Common error builders for typical failure scenarios.
impl CliError {
    /// Error for when an entry id does not exist.
    pub fn entry_not_found(id: &str) -> Self {
        CliError::new(format!("Entry '{}' not found", id))
            .with_context("The entry may have been deleted")
            .with_suggestion("List entries and their ids: kb list")
    }

    /// Error for a draft or patch with a blank required field.
    pub fn invalid_entry(reason: &str) -> Self {
        CliError::new(format!("Invalid entry: {}", reason))
            .with_suggestion("Required fields cannot be blank: name, username, password, website")
    }

    /// Error for a failed backend call.
    pub fn backend_failure(reason: &str) -> Self {
        CliError::new(format!("Backend request failed: {}", reason))
            .with_context("The document store may be unreachable or rejected the request")
            .with_suggestion("Check backend.base_url and the API token: kb config")
            .with_suggestion("Retry with logging enabled: KB_LOG=debug kb ...")
    }

    /// Error for an unusable configuration.
    pub fn config(err: ConfigError) -> Self {
        let suggestion = match &err {
            ConfigError::MissingBaseUrl => {
                "Set backend.base_url in the config file, or use --backend memory"
            }
            _ => "Check the file against: kb config",
        };
        CliError::new(err.to_string())
            .with_context("Config is read from --config, $KB_CONFIG, or the user config directory")
            .with_suggestion(suggestion)
            .with_source(err)
    }
}

impl From<StoreError> for CliError {
    fn from(err: StoreError) -> Self {
        let base = match &err {
            StoreError::NotFound(id) => CliError::entry_not_found(id.as_str()),
            StoreError::InvalidDraft(reason) => CliError::invalid_entry(&reason.to_string()),
            StoreError::Backend(reason) => CliError::backend_failure(&reason.to_string()),
            StoreError::Internal(reason) => CliError::backend_failure(reason),
        };
        base.with_source(err)
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        CliError::config(err)
    }
}
