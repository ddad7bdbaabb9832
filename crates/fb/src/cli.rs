//! CLI argument parsing using clap derive macros.
//!
//! This module defines the command-line interface for the fb CLI.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// fb - Query and edit fleetbooks records from the command line
#[derive(Parser, Debug)]
#[command(name = "fb")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbose output (debug logging on stderr)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Quiet mode (errors only)
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Print JSON instead of tables
    #[arg(long, global = true)]
    pub json: bool,

    /// Disable colors in output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Ledger file to read and write (default: from config, then the data directory)
    #[arg(long, global = true, env = "FLEETBOOKS_DATA", value_name = "PATH")]
    pub data_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List records matching attribute filters
    #[command(alias = "ls")]
    List {
        /// Record type (e.g. invoices, vehicles, bank-accounts)
        entity: String,

        /// Filters of the form field.operator=value (e.g. status.equals=PAID)
        #[arg(value_name = "FILTER")]
        filters: Vec<String>,

        /// Raw URL query string (e.g. "name.contains=Op&sort=id,desc")
        #[arg(long, value_name = "QS")]
        query: Option<String>,

        /// Sort order as field[,asc|desc]; repeat for tie-breakers
        #[arg(short, long, value_name = "FIELD,DIR")]
        sort: Vec<String>,

        /// Page number, starting at 0
        #[arg(short, long)]
        page: Option<usize>,

        /// Page size (default: from config, 20)
        #[arg(long, conflicts_with = "all")]
        size: Option<usize>,

        /// Return every match in one page
        #[arg(long)]
        all: bool,
    },

    /// Count records matching attribute filters
    #[command(alias = "c")]
    Count {
        /// Record type
        entity: String,

        /// Filters of the form field.operator=value
        #[arg(value_name = "FILTER")]
        filters: Vec<String>,

        /// Raw URL query string
        #[arg(long, value_name = "QS")]
        query: Option<String>,
    },

    /// Show one record
    Show {
        /// Record type
        entity: String,

        /// Record id
        id: i64,
    },

    /// Create a record from a JSON object
    #[command(alias = "new")]
    Create {
        /// Record type
        entity: String,

        /// Record as JSON, without an id
        #[arg(id = "json_body", value_name = "JSON")]
        json: String,
    },

    /// Replace a record with a JSON object
    Update {
        /// Record type
        entity: String,

        /// Record id
        id: i64,

        /// Full record as JSON
        #[arg(id = "json_body", value_name = "JSON")]
        json: String,
    },

    /// Change some fields of a record
    Patch {
        /// Record type
        entity: String,

        /// Record id
        id: i64,

        /// JSON object with the fields to change
        #[arg(id = "json_body", value_name = "JSON")]
        json: String,
    },

    /// Delete a record
    #[command(alias = "rm")]
    Delete {
        /// Record type
        entity: String,

        /// Record id
        id: i64,
    },

    /// List the filterable fields of a record type
    Fields {
        /// Record type
        entity: String,
    },

    /// Write demo records to the ledger
    Seed {
        /// Overwrite a ledger that already has records
        #[arg(short, long)]
        force: bool,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
}

/// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show current configuration (default)
    Show,

    /// Print the config file path
    Path,

    /// Write a commented default config file
    Init {
        /// Overwrite an existing config file
        #[arg(short, long)]
        force: bool,
    },

    /// Set a configuration value
    Set {
        /// Key such as data_file or output.page_size
        key: String,

        /// New value
        value: String,
    },
}

/// Shell types for completions
#[derive(ValueEnum, Clone, Debug)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    Powershell,
}
