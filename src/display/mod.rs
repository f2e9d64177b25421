//! Display formatting for terminal output
//!
//! Tables, detail views, stats cards, and error echoes. Everything returns a
//! `String`; the CLI decides where it goes.

pub mod entities;
pub mod period;
pub mod table;

pub use period::format_actions;
pub use table::{format_details, format_pagination, format_table, render_table, Tabular};

use crate::audit::AuditEntry;
use crate::error::FieldErrors;
use crate::services::StatCard;

/// Stats cards on one line: `Total: 12  |  Open: 9  |  Closed: 3`
pub fn format_stats(cards: &[StatCard]) -> String {
    cards
        .iter()
        .map(|card| format!("{}: {}", card.label, card.value))
        .collect::<Vec<_>>()
        .join("  |  ")
}

/// Per-field validation messages, one per line
pub fn format_field_errors(errors: &FieldErrors) -> String {
    let width = errors.keys().map(|k| k.len()).max().unwrap_or(0);
    let mut output = String::new();
    for (field, message) in errors {
        output.push_str(&format!("  {:<width$}  {}\n", field, message, width = width));
    }
    output
}

/// Audit entries, newest last
pub fn format_audit(entries: &[AuditEntry]) -> String {
    if entries.is_empty() {
        return "No audit entries found.".to_string();
    }
    let mut output = String::new();
    for entry in entries {
        output.push_str(&entry.format_human_readable());
        output.push('\n');
    }
    output
}
