//! Fields command implementation.
//!
//! Lists what can be filtered and sorted on for a record type.

use fleetbooks_ledger::EntityKind;

use super::{CommandContext, Result};
use crate::output::{format_fields_json, format_fields_table};

/// Executes the fields command.
pub fn execute(ctx: &CommandContext, entity: &str) -> Result<()> {
    let kind: EntityKind = entity.parse()?;
    let fields = kind.describe();

    if ctx.json_output {
        println!("{}", format_fields_json(kind, &fields)?);
    } else if !ctx.quiet {
        print!("{}", format_fields_table(&fields, ctx.use_colors));
    }

    Ok(())
}
