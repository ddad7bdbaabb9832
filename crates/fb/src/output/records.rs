//! Record, page and field listing output.

use fleetbooks_ledger::{EntityKind, FieldInfo, SearchResult};
use owo_colors::OwoColorize;
use serde::Serialize;
use serde_json::Value;

use super::helpers::{cell_text, render_table};

/// Formats a page of records as JSON.
pub fn format_search_json(result: &SearchResult) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(result)
}

/// Formats a page of records as a table, one column per field.
///
/// The footer carries the total match count.
pub fn format_search_table(kind: EntityKind, result: &SearchResult, use_colors: bool) -> String {
    if result.total == 0 {
        return format!("No {kind} found.\n");
    }

    let headers = kind.field_names();
    let rows: Vec<Vec<String>> = result
        .records
        .iter()
        .map(|record| {
            headers
                .iter()
                .map(|field| cell_text(record.get(*field)))
                .collect()
        })
        .collect();

    let mut output = if rows.is_empty() {
        String::new()
    } else {
        render_table(&headers, &rows, use_colors)
    };

    let footer = match result.size {
        Some(size) => format!(
            "{} of {} {kind} (page {}, size {size})",
            rows.len(),
            result.total,
            result.page
        ),
        None => format!("{} of {} {kind}", rows.len(), result.total),
    };
    if use_colors {
        output.push_str(&format!("{}\n", footer.dimmed()));
    } else {
        output.push_str(&footer);
        output.push('\n');
    }

    output
}

/// JSON output for `fb count`.
#[derive(Serialize)]
pub struct CountOutput {
    pub entity: &'static str,
    pub total: usize,
}

/// Formats a count as JSON.
pub fn format_count_json(kind: EntityKind, total: usize) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&CountOutput {
        entity: kind.resource(),
        total,
    })
}

/// Formats a single record as field/value lines.
pub fn format_record_table(kind: EntityKind, record: &Value, use_colors: bool) -> String {
    let names = kind.field_names();
    let width = names.iter().map(|name| name.len()).max().unwrap_or(0);

    let mut output = String::new();
    for name in names {
        let label = format!("{name:<width$}");
        let value = cell_text(record.get(name));
        if use_colors {
            output.push_str(&format!("{}  {value}", label.dimmed()));
        } else {
            output.push_str(&format!("{label}  {value}"));
        }
        // Keep lines clean when the value is empty.
        let trimmed_len = output.trim_end_matches(' ').len();
        output.truncate(trimmed_len);
        output.push('\n');
    }
    output
}

/// Formats a single record as JSON.
pub fn format_record_json(record: &Value) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(record)
}

/// JSON output for `fb fields`.
#[derive(Serialize)]
pub struct FieldsOutput<'a> {
    pub entity: &'static str,
    pub fields: &'a [FieldInfo],
}

/// Formats field descriptions as JSON.
pub fn format_fields_json(kind: EntityKind, fields: &[FieldInfo]) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&FieldsOutput {
        entity: kind.resource(),
        fields,
    })
}

/// Formats field descriptions as a table.
pub fn format_fields_table(fields: &[FieldInfo], use_colors: bool) -> String {
    let rows: Vec<Vec<String>> = fields
        .iter()
        .map(|field| {
            let field_type = if field.values.is_empty() {
                field.field_type.to_string()
            } else {
                format!("{} ({})", field.field_type, field.values.join("|"))
            };
            vec![field.name.to_string(), field_type, field.operators.join(", ")]
        })
        .collect();

    render_table(&["Field", "Type", "Operators"], &rows, use_colors)
}
