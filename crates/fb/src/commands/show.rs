//! Show command implementation.

use fleetbooks_ledger::EntityKind;

use super::{CommandContext, Result};
use crate::output::{format_record_json, format_record_table};

/// Executes the show command.
///
/// # Errors
///
/// Returns `LedgerError::RecordNotFound` (exit code 4) if no record of this
/// kind has the id.
pub async fn execute(ctx: &CommandContext, entity: &str, id: i64) -> Result<()> {
    let kind: EntityKind = entity.parse()?;
    let ledger = ctx.load_ledger().await?;
    let record = ledger.find_json(kind, id)?;

    if ctx.json_output {
        println!("{}", format_record_json(&record)?);
    } else if !ctx.quiet {
        print!("{}", format_record_table(kind, &record, ctx.use_colors));
    }

    Ok(())
}
