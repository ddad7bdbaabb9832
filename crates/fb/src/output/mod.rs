//! Output formatting for tables and JSON.

pub mod helpers;
mod records;

pub use records::{
    format_count_json, format_fields_json, format_fields_table, format_record_json,
    format_record_table, format_search_json, format_search_table,
};
