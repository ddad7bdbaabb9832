//! Routes parsed CLI commands to their handlers.
//!
//! Config, completions and bare `fb` run before the config file is read, so
//! a broken config can still be inspected and rewritten.

use crate::cli::{Cli, Commands, ConfigCommands};
use crate::commands::config;
use crate::commands::list::{CountOptions, ListOptions};
use crate::commands::mutate::Mutation;
use crate::commands::{self, CommandContext, CommandError, Result};

/// Runs the command selected by `cli`.
pub async fn run(cli: &Cli) -> Result<()> {
    match &cli.command {
        None => {
            if !cli.quiet {
                println!("fb - fleetbooks CLI");
                println!("Use --help for usage information");
            }
            Ok(())
        }
        Some(Commands::Completions { shell }) => {
            commands::completions::execute(shell).map_err(CommandError::Io)
        }
        Some(Commands::Config { command }) => {
            // `config path` and `config init` work even when the file does not parse.
            let loaded = config::load_config().unwrap_or_default();
            let ctx = CommandContext::new(cli, &loaded)?;
            dispatch_config(&ctx, command)
        }
        Some(command) => {
            let loaded = config::load_config()?;
            let ctx = CommandContext::new(cli, &loaded)?;
            dispatch_data(&ctx, command).await
        }
    }
}

fn dispatch_config(ctx: &CommandContext, command: &Option<ConfigCommands>) -> Result<()> {
    match command {
        Some(ConfigCommands::Show) | None => config::execute_show(ctx),
        Some(ConfigCommands::Path) => config::execute_path(ctx),
        Some(ConfigCommands::Init { force }) => config::execute_init(ctx, *force),
        Some(ConfigCommands::Set { key, value }) => {
            let opts = config::ConfigSetOptions {
                key: key.clone(),
                value: value.clone(),
            };
            config::execute_set(ctx, &opts)
        }
    }
}

async fn dispatch_data(ctx: &CommandContext, command: &Commands) -> Result<()> {
    match command {
        Commands::List {
            entity,
            filters,
            query,
            sort,
            page,
            size,
            all,
        } => {
            let opts = ListOptions {
                entity: entity.clone(),
                filters: filters.clone(),
                query: query.clone(),
                sort: sort.clone(),
                page: *page,
                size: *size,
                all: *all,
            };
            commands::list::execute(ctx, &opts).await
        }
        Commands::Count {
            entity,
            filters,
            query,
        } => {
            let opts = CountOptions {
                entity: entity.clone(),
                filters: filters.clone(),
                query: query.clone(),
            };
            commands::list::execute_count(ctx, &opts).await
        }
        Commands::Show { entity, id } => commands::show::execute(ctx, entity, *id).await,
        Commands::Create { entity, json } => {
            let mutation = Mutation::Create { json: json.clone() };
            commands::mutate::execute(ctx, entity, &mutation).await
        }
        Commands::Update { entity, id, json } => {
            let mutation = Mutation::Update {
                id: *id,
                json: json.clone(),
            };
            commands::mutate::execute(ctx, entity, &mutation).await
        }
        Commands::Patch { entity, id, json } => {
            let mutation = Mutation::Patch {
                id: *id,
                json: json.clone(),
            };
            commands::mutate::execute(ctx, entity, &mutation).await
        }
        Commands::Delete { entity, id } => {
            commands::mutate::execute(ctx, entity, &Mutation::Delete { id: *id }).await
        }
        Commands::Fields { entity } => commands::fields::execute(ctx, entity),
        Commands::Seed { force } => commands::seed::execute(ctx, *force).await,
        Commands::Config { .. } | Commands::Completions { .. } => Err(CommandError::Config(
            "config and completions do not read the ledger".to_string(),
        )),
    }
}
