//! Export module for ledgerdesk
//!
//! Any list page can be written as a table (the default), as JSON (the list
//! envelope exactly as the API answered it) or as CSV (one row per entity).

pub mod csv;
pub mod json;

use std::fmt;

pub use self::csv::export_csv;
pub use self::json::export_json;

/// Output format for list and show commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum ExportFormat {
    #[default]
    Table,
    Json,
    Csv,
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Table => write!(f, "table"),
            Self::Json => write!(f, "json"),
            Self::Csv => write!(f, "csv"),
        }
    }
}
