//! Create, update, patch and delete command implementations.
//!
//! Each command loads the ledger, applies one repository operation and
//! saves the ledger before printing the affected record.

use fleetbooks_ledger::EntityKind;
use serde_json::Value;
use tracing::debug;

use super::{CommandContext, Result};
use crate::output::{format_record_json, format_record_table};

/// A single write against the ledger.
#[derive(Debug)]
pub enum Mutation {
    Create { json: String },
    Update { id: i64, json: String },
    Patch { id: i64, json: String },
    Delete { id: i64 },
}

impl Mutation {
    fn verb(&self) -> &'static str {
        match self {
            Mutation::Create { .. } => "Created",
            Mutation::Update { .. } => "Updated",
            Mutation::Patch { .. } => "Patched",
            Mutation::Delete { .. } => "Deleted",
        }
    }
}

/// Executes a mutating command.
///
/// Nothing is written when the operation fails.
///
/// # Errors
///
/// Returns an error if the entity is unknown, the JSON argument is invalid,
/// the repository rejects the change, or the ledger file cannot be written.
pub async fn execute(ctx: &CommandContext, entity: &str, mutation: &Mutation) -> Result<()> {
    let kind: EntityKind = entity.parse()?;
    let mut ledger = ctx.load_ledger().await?;

    let record = match mutation {
        Mutation::Create { json } => ledger.create_json(kind, parse_json(json)?)?,
        Mutation::Update { id, json } => ledger.update_json(kind, *id, parse_json(json)?)?,
        Mutation::Patch { id, json } => ledger.patch_json(kind, *id, &parse_json(json)?)?,
        Mutation::Delete { id } => ledger.delete_json(kind, *id)?,
    };

    ctx.save_ledger(&ledger).await?;
    debug!(entity = %kind, id = ?record.get("id"), action = mutation.verb(), "ledger updated");

    if ctx.json_output {
        println!("{}", format_record_json(&record)?);
    } else if !ctx.quiet {
        let id = record.get("id").and_then(Value::as_i64).unwrap_or_default();
        println!("{} {} {id}", mutation.verb(), kind.entity_name());
        if !matches!(mutation, Mutation::Delete { .. }) {
            print!("{}", format_record_table(kind, &record, ctx.use_colors));
        }
    }

    Ok(())
}

fn parse_json(raw: &str) -> Result<Value> {
    Ok(serde_json::from_str(raw)?)
}
