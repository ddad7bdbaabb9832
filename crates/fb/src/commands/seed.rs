//! Seed command implementation.

use fleetbooks_ledger::seed::demo_ledger;

use super::{CommandContext, CommandError, Result};

/// Executes the seed command.
///
/// # Errors
///
/// Returns `CommandError::LedgerNotEmpty` if the ledger already has records
/// and `force` is false.
pub async fn execute(ctx: &CommandContext, force: bool) -> Result<()> {
    let existing = ctx.load_ledger().await?;
    if !existing.is_empty() && !force {
        return Err(CommandError::LedgerNotEmpty {
            path: ctx.data_file.clone(),
            records: existing.record_count(),
        });
    }

    let ledger = demo_ledger()?;
    ctx.save_ledger(&ledger).await?;

    if ctx.json_output {
        let output = serde_json::json!({
            "status": "success",
            "path": ctx.data_file.display().to_string(),
            "records": ledger.record_count(),
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else if !ctx.quiet {
        println!(
            "Wrote {} demo records to {}",
            ledger.record_count(),
            ctx.data_file.display()
        );
    }

    Ok(())
}
