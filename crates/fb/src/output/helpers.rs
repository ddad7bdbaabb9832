//! Common helper functions for output formatting.

use owo_colors::OwoColorize;
use serde_json::Value;

/// Widest a table column may grow before cells are truncated.
pub const MAX_COLUMN_WIDTH: usize = 32;

/// Truncates a string to at most `max_len` characters.
pub fn truncate_str(s: &str, max_len: usize) -> String {
    if s.chars().count() > max_len {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{kept}...")
    } else {
        s.to_string()
    }
}

/// Renders a JSON field value as a table cell.
///
/// Strings print without quotes and nulls print as nothing.
pub fn cell_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

/// Lays out `rows` under `headers` in left-aligned columns.
pub fn render_table(headers: &[&str], rows: &[Vec<String>], use_colors: bool) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count().min(MAX_COLUMN_WIDTH));
        }
    }

    let mut output = String::new();

    let header = join_cells(headers.iter().map(|h| h.to_string()), &widths);
    if use_colors {
        output.push_str(&format!("{}\n", header.dimmed()));
    } else {
        output.push_str(&header);
        output.push('\n');
    }

    for row in rows {
        let cells = row.iter().map(|cell| truncate_str(cell, MAX_COLUMN_WIDTH));
        output.push_str(&join_cells(cells, &widths));
        output.push('\n');
    }

    output
}

fn join_cells(cells: impl Iterator<Item = String>, widths: &[usize]) -> String {
    let line = cells
        .zip(widths)
        .map(|(cell, width)| {
            let pad = width.saturating_sub(cell.chars().count());
            format!("{cell}{}", " ".repeat(pad))
        })
        .collect::<Vec<_>>()
        .join("  ");
    line.trim_end().to_string()
}
