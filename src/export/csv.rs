//! CSV export
//!
//! One row per entity using the wire (camelCase) field names as headers.

use std::io::Write;

use serde::Serialize;

use crate::error::{LedgerError, LedgerResult};

/// Write entities as CSV; an empty slice writes nothing
pub fn export_csv<T: Serialize, W: Write>(items: &[T], writer: W) -> LedgerResult<usize> {
    let mut csv_writer = ::csv::Writer::from_writer(writer);
    for item in items {
        csv_writer
            .serialize(item)
            .map_err(|e| LedgerError::Export(format!("Failed to write CSV row: {}", e)))?;
    }
    csv_writer
        .flush()
        .map_err(|e| LedgerError::Export(e.to_string()))?;
    Ok(items.len())
}
