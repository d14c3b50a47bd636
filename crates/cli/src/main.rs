// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! kb - Keybook credential store CLI

mod commands;
mod config;
mod error;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::entry::{self, EntryCommand};
use kb_adapters::{
    sample_entries, EntryBackend, HttpDocumentProxy, InMemoryBackend, Namespace, RemoteBackend,
    TracedBackend,
};
use kb_engine::EntryStore;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use crate::config::{BackendConfig, BackendKind, KeybookConfig};
use crate::error::CliError;
use crate::output::OutputFormat;

const LOG_ENV: &str = "KB_LOG";

#[derive(Parser)]
#[command(name = "kb", version, about = "Keybook - credential entry store")]
struct Cli {
    /// Config file (defaults to $KB_CONFIG, then the user config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Override the configured backend
    #[arg(long, global = true, value_enum)]
    backend: Option<BackendKind>,

    #[arg(long, global = true, value_enum, default_value = "text")]
    format: OutputFormat,

    /// Show passwords instead of masking them
    #[arg(long, global = true)]
    reveal: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(flatten)]
    Entry(EntryCommand),
    /// Print the effective configuration
    Config,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    setup_logging();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            match err.downcast_ref::<CliError>() {
                Some(cli_error) => eprint!("{}", cli_error),
                None => eprintln!("error: {:#}", err),
            }
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let path = config::resolve_path(
        cli.config,
        std::env::var_os(config::CONFIG_ENV).map(PathBuf::from),
        config::user_config_path(),
    )
    .map_err(CliError::from)?;

    let mut config = KeybookConfig::load(path.as_deref()).map_err(CliError::from)?;
    if let Some(kind) = cli.backend {
        config.select_backend(kind);
    }
    config.override_token(std::env::var(config::TOKEN_ENV).ok());

    let command = match cli.command {
        Commands::Config => {
            commands::config::show(&config, path.as_deref(), cli.format)?;
            return Ok(());
        }
        Commands::Entry(command) => command,
    };

    let options = entry::Options {
        format: cli.format,
        reveal: cli.reveal,
        debounce: config.validator.debounce,
    };

    match &config.backend {
        BackendConfig::Memory(memory) => {
            let mut backend = InMemoryBackend::new().with_latency(memory.latency);
            if memory.seed_samples {
                backend = backend.with_entries(sample_entries(chrono::Utc::now()));
            }
            dispatch(backend, &config, command, options).await
        }
        BackendConfig::Remote(remote) => {
            remote.validate().map_err(CliError::from)?;
            let proxy = HttpDocumentProxy::new(
                remote.base_url.as_str(),
                remote.api_token.clone(),
                remote.timeout,
            );
            tracing::debug!(?proxy, "using remote backend");
            let namespace = Namespace::new(remote.database.as_str(), remote.collection.as_str());
            dispatch(RemoteBackend::new(proxy, namespace), &config, command, options).await
        }
    }
}

async fn dispatch<B: EntryBackend>(
    backend: B,
    config: &KeybookConfig,
    command: EntryCommand,
    options: entry::Options,
) -> Result<()> {
    let store =
        EntryStore::new(TracedBackend::new(backend)).allocation(config.store.allocation);
    entry::handle(command, Arc::new(store), options).await?;
    Ok(())
}

fn setup_logging() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
}
