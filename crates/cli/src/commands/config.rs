// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Config command

use crate::config::KeybookConfig;
use crate::error::CliError;
use crate::output::OutputFormat;
use std::path::Path;

/// Print the effective configuration with secrets redacted
pub fn show(
    config: &KeybookConfig,
    source: Option<&Path>,
    format: OutputFormat,
) -> Result<(), CliError> {
    let redacted = config.redacted();
    match format {
        OutputFormat::Text => {
            match source {
                Some(path) => println!("# loaded from {}", path.display()),
                None => println!("# built-in defaults"),
            }
            print!("{}", redacted.to_toml()?);
        }
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&redacted)
                .map_err(|e| CliError::new(format!("failed to render config: {}", e)))?;
            println!("{}", json);
        }
    }
    Ok(())
}
