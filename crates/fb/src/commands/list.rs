//! List and count command implementations.
//!
//! Both read filter parameters from positional `field.operator=value`
//! arguments and an optional raw query string, then evaluate them against
//! the ledger.

use fleetbooks_criteria::FilterError;
use fleetbooks_ledger::EntityKind;
use tracing::debug;

use super::{CommandContext, Result};
use crate::output::{format_count_json, format_search_json, format_search_table};

/// Options for the list command.
#[derive(Debug, Default)]
pub struct ListOptions {
    /// Record type name.
    pub entity: String,
    /// `field.operator=value` arguments.
    pub filters: Vec<String>,
    /// Raw URL query string.
    pub query: Option<String>,
    /// `field[,direction]` sort keys, most significant first.
    pub sort: Vec<String>,
    /// Page number.
    pub page: Option<usize>,
    /// Page size.
    pub size: Option<usize>,
    /// Return every match.
    pub all: bool,
}

/// Options for the count command.
#[derive(Debug, Default)]
pub struct CountOptions {
    pub entity: String,
    pub filters: Vec<String>,
    pub query: Option<String>,
}

/// Executes the list command.
///
/// # Errors
///
/// Returns an error if the entity is unknown, a filter is invalid, or the
/// ledger file cannot be read.
pub async fn execute(ctx: &CommandContext, opts: &ListOptions) -> Result<()> {
    let kind: EntityKind = opts.entity.parse()?;
    let params = list_params(opts)?;
    let default_size = (!opts.all).then_some(ctx.page_size);

    let ledger = ctx.load_ledger().await?;
    let result = ledger.search(kind, params, default_size)?;
    debug!(entity = %kind, total = result.total, shown = result.records.len(), "listed records");

    if ctx.json_output {
        println!("{}", format_search_json(&result)?);
    } else if !ctx.quiet {
        print!("{}", format_search_table(kind, &result, ctx.use_colors));
    }

    Ok(())
}

/// Executes the count command.
///
/// # Errors
///
/// Returns an error if the entity is unknown, a filter is invalid, or the
/// ledger file cannot be read.
pub async fn execute_count(ctx: &CommandContext, opts: &CountOptions) -> Result<()> {
    let kind: EntityKind = opts.entity.parse()?;
    let params = filter_params(&opts.filters, opts.query.as_deref())?;

    let ledger = ctx.load_ledger().await?;
    let total = ledger.count_matching(kind, params)?;

    if ctx.json_output {
        println!("{}", format_count_json(kind, total)?);
    } else {
        println!("{total}");
    }

    Ok(())
}

/// Builds the full parameter list for `list`.
///
/// Flags come after the query string, so `--sort` adds tie-breakers to a
/// `sort` inside `--query` and `--page`/`--size` override its paging.
fn list_params(opts: &ListOptions) -> Result<Vec<(String, String)>> {
    let mut params = filter_params(&opts.filters, opts.query.as_deref())?;

    params.extend(opts.sort.iter().map(|s| ("sort".to_string(), s.clone())));
    if let Some(page) = opts.page {
        params.push(("page".to_string(), page.to_string()));
    }
    if let Some(size) = opts.size {
        params.push(("size".to_string(), size.to_string()));
    }

    Ok(params)
}

/// Decodes `query` and appends each positional filter.
fn filter_params(filters: &[String], query: Option<&str>) -> Result<Vec<(String, String)>> {
    let mut params = match query {
        Some(query) => decode_query(query)?,
        None => Vec::new(),
    };

    for raw in filters {
        let (key, value) = raw.split_once('=').ok_or_else(|| {
            FilterError::invalid_syntax(raw, "expected field.operator=value")
        })?;
        params.push((key.to_string(), value.to_string()));
    }

    Ok(params)
}

fn decode_query(query: &str) -> Result<Vec<(String, String)>> {
    let query = query.strip_prefix('?').unwrap_or(query);
    serde_urlencoded::from_str(query)
        .map_err(|e| FilterError::invalid_syntax(query, e.to_string()).into())
}
