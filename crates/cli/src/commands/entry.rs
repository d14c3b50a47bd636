// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Entry commands

use crate::error::CliError;
use crate::output::{self, EntryDetail, EntryView, OutputFormat};
use clap::{Args, Subcommand, ValueEnum};
use kb_adapters::EntryBackend;
use kb_core::{
    generate_password, EntryDraft, EntryId, EntryPatch, EntryQuery, SortDirection, SortField,
    DEFAULT_PASSWORD_LENGTH,
};
use kb_engine::{EntryStore, StoreError, UniquenessValidator, UsernameStatus};
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

#[derive(Subcommand)]
pub enum EntryCommand {
    /// List entries
    List(ListArgs),
    /// Show a single entry
    Show {
        /// Entry id
        id: String,
    },
    /// Create an entry
    Add(AddArgs),
    /// Change fields of an entry
    Edit(EditArgs),
    /// Delete an entry
    Remove {
        /// Entry id
        id: String,
    },
    /// Check whether a username is already used for a website
    Check {
        username: String,
        website: String,
    },
}

#[derive(Args)]
pub struct ListArgs {
    /// Filter by name, username, website or serial number
    #[arg(long)]
    pub search: Option<String>,
    #[arg(long, value_enum, default_value = "serial")]
    pub sort: SortArg,
    /// Sort descending
    #[arg(long)]
    pub desc: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum SortArg {
    Serial,
    Name,
    Website,
    Created,
}

impl From<SortArg> for SortField {
    fn from(arg: SortArg) -> Self {
        match arg {
            SortArg::Serial => SortField::SerialNumber,
            SortArg::Name => SortField::Name,
            SortArg::Website => SortField::Website,
            SortArg::Created => SortField::CreatedAt,
        }
    }
}

#[derive(Args)]
pub struct AddArgs {
    #[arg(long)]
    pub name: String,
    #[arg(long)]
    pub username: String,
    #[arg(long, required_unless_present = "generate")]
    pub password: Option<String>,
    /// Generate a random password instead of passing --password
    #[arg(long, conflicts_with = "password")]
    pub generate: bool,
    /// Length of the generated password
    #[arg(
        long,
        requires = "generate",
        default_value_t = DEFAULT_PASSWORD_LENGTH as u16,
        value_parser = clap::value_parser!(u16).range(1..=256)
    )]
    pub length: u16,
    #[arg(long)]
    pub website: String,
    /// Logo URL shown next to the entry
    #[arg(long)]
    pub logo: Option<String>,
}

impl AddArgs {
    fn password(&self) -> String {
        match &self.password {
            Some(password) if !self.generate => password.clone(),
            _ => generate_password(usize::from(self.length)),
        }
    }
}

#[derive(Args)]
pub struct EditArgs {
    /// Entry id
    pub id: String,
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub username: Option<String>,
    #[arg(long)]
    pub password: Option<String>,
    #[arg(long)]
    pub website: Option<String>,
    #[arg(long)]
    pub logo: Option<String>,
}

impl EditArgs {
    fn patch(&self) -> EntryPatch {
        EntryPatch {
            name: self.name.clone(),
            username: self.username.clone(),
            password: self.password.clone(),
            website: self.website.clone(),
            logo: self.logo.clone(),
        }
    }
}

/// Settings shared by every entry command
#[derive(Debug, Clone, Copy)]
pub struct Options {
    pub format: OutputFormat,
    pub reveal: bool,
    pub debounce: Duration,
}

#[derive(Serialize)]
struct CheckReport {
    username: String,
    website: String,
    taken: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
}

impl fmt::Display for CheckReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.message {
            Some(message) => write!(f, "{}", message),
            None => write!(f, "Username {} is available for {}", self.username, self.website),
        }
    }
}

#[derive(Serialize)]
struct Deleted {
    deleted: String,
}

impl fmt::Display for Deleted {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Deleted entry {}", self.deleted)
    }
}

pub async fn handle<B: EntryBackend>(
    command: EntryCommand,
    store: Arc<EntryStore<B>>,
    options: Options,
) -> Result<(), CliError> {
    match command {
        EntryCommand::List(args) => list(&store, args, options).await,
        EntryCommand::Show { id } => {
            let entry = store.get_by_id(&EntryId(id)).await?;
            output::print(&EntryDetail(EntryView::new(entry, options.reveal)), options.format);
            Ok(())
        }
        EntryCommand::Add(args) => add(store, args, options).await,
        EntryCommand::Edit(args) => {
            let patch = args.patch();
            if patch.is_empty() {
                return Err(CliError::new("Nothing to update").with_suggestion(
                    "Pass at least one of --name, --username, --password, --website, --logo",
                ));
            }
            let entry = store.update(&EntryId(args.id), patch).await?;
            output::print(&EntryDetail(EntryView::new(entry, options.reveal)), options.format);
            Ok(())
        }
        EntryCommand::Remove { id } => {
            store.delete(&EntryId(id.clone())).await?;
            output::print(&Deleted { deleted: id }, options.format);
            Ok(())
        }
        EntryCommand::Check { username, website } => check(store, username, website, options).await,
    }
}

async fn list<B: EntryBackend>(
    store: &EntryStore<B>,
    args: ListArgs,
    options: Options,
) -> Result<(), CliError> {
    let mut query = EntryQuery::new().sort_by(args.sort.into());
    if let Some(search) = args.search {
        query = query.search(search);
    }
    if args.desc {
        query = query.direction(SortDirection::Descending);
    }

    let views: Vec<EntryView> = store
        .query(&query)
        .await?
        .into_iter()
        .map(|entry| EntryView::new(entry, options.reveal))
        .collect();

    if let OutputFormat::Text = options.format {
        if views.is_empty() {
            println!("No entries");
            return Ok(());
        }
        println!("{}", output::list_header());
    }
    output::print_list(&views, options.format);
    Ok(())
}

async fn add<B: EntryBackend>(
    store: Arc<EntryStore<B>>,
    args: AddArgs,
    options: Options,
) -> Result<(), CliError> {
    let password = args.password();
    let mut draft = EntryDraft::new(args.name, args.username, password, args.website)
        .map_err(StoreError::from)?;
    if let Some(logo) = args.logo {
        draft = draft.with_logo(logo);
    }

    // Advisory only: a duplicate is reported but still saved
    let validator = UniquenessValidator::with_window(Arc::clone(&store), options.debounce);
    if let UsernameStatus::Taken(failure) = validator
        .check_now(draft.username(), draft.website())
        .await
    {
        eprintln!("warning: {}", failure);
    }

    let entry = store.create(draft).await?;
    if args.generate && !options.reveal {
        eprintln!(
            "note: generated a {}-character password, view it with: kb show {} --reveal",
            args.length, entry.id
        );
    }
    output::print(&EntryDetail(EntryView::new(entry, options.reveal)), options.format);
    Ok(())
}

async fn check<B: EntryBackend>(
    store: Arc<EntryStore<B>>,
    username: String,
    website: String,
    options: Options,
) -> Result<(), CliError> {
    let validator = UniquenessValidator::with_window(store, options.debounce);
    let mut updates = validator.subscribe();
    validator.input(&username, &website);

    // Wait for the debounced check to settle
    let status = loop {
        updates
            .changed()
            .await
            .map_err(|_| CliError::new("Username check was interrupted"))?;
        let status = updates.borrow_and_update().clone();
        if status != UsernameStatus::Checking {
            break status;
        }
    };

    let report = match status {
        UsernameStatus::Taken(failure) => CheckReport {
            username,
            website,
            taken: true,
            message: Some(failure.to_string()),
        },
        UsernameStatus::Available => CheckReport {
            username,
            website,
            taken: false,
            message: None,
        },
        UsernameStatus::Failed(reason) => return Err(CliError::backend_failure(&reason)),
        UsernameStatus::Idle | UsernameStatus::Checking => {
            return Err(CliError::new("Username and website are both required"))
        }
    };
    output::print(&report, options.format);
    Ok(())
}
