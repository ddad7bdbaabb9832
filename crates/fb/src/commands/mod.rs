//! Command implementations for the fb CLI.
//!
//! This module contains the actual command handlers that are invoked by the CLI.

pub mod completions;
pub mod config;
pub mod fields;
pub mod list;
pub mod mutate;
pub mod seed;
pub mod show;

use std::env;
use std::path::PathBuf;

use fleetbooks_criteria::FilterError;
use fleetbooks_ledger::{Ledger, LedgerError, LedgerStore, LedgerStoreError};
use tracing::debug;

use crate::cli::Cli;
use config::Config;

/// Error type for command execution.
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    /// Repository, lookup or filter error from the ledger.
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    /// Filter error raised while reading command-line filters.
    #[error(transparent)]
    Filter(#[from] FilterError),

    /// Ledger file error.
    #[error("storage error: {0}")]
    Store(#[from] LedgerStoreError),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// `seed` would overwrite existing records.
    #[error("ledger '{path}' already holds {records} records (use --force to replace them)")]
    LedgerNotEmpty { path: PathBuf, records: usize },

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A JSON argument could not be read.
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl CommandError {
    /// Stable error code for JSON output.
    pub fn code(&self) -> &'static str {
        match self {
            CommandError::Filter(_) | CommandError::Ledger(LedgerError::Filter(_)) => "FILTER_ERROR",
            CommandError::Ledger(LedgerError::RecordNotFound { .. }) => "NOT_FOUND",
            CommandError::Ledger(LedgerError::UnknownEntity { .. }) => "UNKNOWN_ENTITY",
            CommandError::Ledger(
                LedgerError::IdAlreadyAssigned { .. }
                | LedgerError::MissingId { .. }
                | LedgerError::IdMismatch { .. }
                | LedgerError::InvalidPatch { .. }
                | LedgerError::InvalidSeed { .. }
                | LedgerError::Json(_),
            ) => "INVALID_RECORD",
            CommandError::Ledger(LedgerError::IdSequenceExhausted { .. }) => "ID_SEQUENCE_EXHAUSTED",
            CommandError::Store(_) => "STORE_ERROR",
            CommandError::Config(_) => "CONFIG_ERROR",
            CommandError::LedgerNotEmpty { .. } => "LEDGER_NOT_EMPTY",
            CommandError::Io(_) => "IO_ERROR",
            CommandError::Json(_) => "JSON_ERROR",
        }
    }

    /// Process exit status for this error.
    pub fn exit_status(&self) -> u8 {
        match self {
            CommandError::Ledger(LedgerError::RecordNotFound { .. }) => 4,
            CommandError::Store(_)
            | CommandError::Config(_)
            | CommandError::Ledger(LedgerError::IdSequenceExhausted { .. }) => 5,
            CommandError::Io(_) => 3,
            _ => 1,
        }
    }
}

/// Result type for command execution.
pub type Result<T> = std::result::Result<T, CommandError>;

/// Context for command execution, containing common dependencies.
#[derive(Debug)]
pub struct CommandContext {
    /// Whether to output JSON.
    pub json_output: bool,
    /// Whether to use colors.
    pub use_colors: bool,
    /// Whether to be quiet (errors only).
    pub quiet: bool,
    /// Whether to be verbose.
    pub verbose: bool,
    /// Ledger file the data commands read and write.
    pub data_file: PathBuf,
    /// Page size for `list` when none is given.
    pub page_size: usize,
}

impl CommandContext {
    /// Creates a command context from CLI arguments and the loaded config.
    ///
    /// The ledger path comes from `--data-file` / `FLEETBOOKS_DATA`, then the
    /// config's `data_file`, then the platform data directory.
    pub fn new(cli: &Cli, config: &Config) -> Result<Self> {
        let data_file = match (&cli.data_file, &config.data_file) {
            (Some(path), _) => path.clone(),
            (None, Some(path)) => path.clone(),
            (None, None) => LedgerStore::default_path()?,
        };

        let use_colors = !cli.no_color
            && config.output.color.unwrap_or(true)
            && env::var_os("NO_COLOR").is_none();

        Ok(Self {
            json_output: cli.json,
            use_colors,
            quiet: cli.quiet,
            verbose: cli.verbose,
            data_file,
            page_size: config.page_size(),
        })
    }

    /// Store for the resolved ledger file.
    pub fn store(&self) -> LedgerStore {
        LedgerStore::with_path(&self.data_file)
    }

    /// Reads the ledger, treating a missing file as empty.
    pub async fn load_ledger(&self) -> Result<Ledger> {
        debug!(path = %self.data_file.display(), "loading ledger");
        Ok(self.store().load_or_default_async().await?)
    }

    /// Writes the ledger back to the resolved file.
    pub async fn save_ledger(&self, ledger: &Ledger) -> Result<()> {
        debug!(path = %self.data_file.display(), records = ledger.record_count(), "saving ledger");
        Ok(self.store().save_async(ledger).await?)
    }
}
