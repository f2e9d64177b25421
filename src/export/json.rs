//! JSON export
//!
//! Writes pretty-printed JSON with a trailing newline.

use std::io::Write;

use serde::Serialize;

use crate::error::{LedgerError, LedgerResult};

/// Write any serializable value (a list envelope, a single entity)
pub fn export_json<T: Serialize, W: Write>(value: &T, writer: &mut W) -> LedgerResult<()> {
    serde_json::to_writer_pretty(&mut *writer, value)
        .map_err(|e| LedgerError::Export(format!("Failed to write JSON: {}", e)))?;
    writeln!(writer).map_err(|e| LedgerError::Export(e.to_string()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{Page, Pagination};
    use crate::models::{EconomicGroup, EconomicGroupInput, Resource};
    use chrono::Utc;

    #[test]
    fn test_export_list_envelope() {
        let group = EconomicGroup::build(
            EconomicGroup::new_id(),
            EconomicGroupInput::new("HOLD", "Holding"),
            Utc::now(),
        );
        let page = Page {
            data: vec![group],
            pagination: Pagination::new(1, 10, 1),
        };

        let mut buffer = Vec::new();
        export_json(&page, &mut buffer).unwrap();

        let value: serde_json::Value = serde_json::from_slice(&buffer).unwrap();
        assert_eq!(value["data"][0]["code"], "HOLD");
        assert_eq!(value["pagination"]["totalPages"], 1);
        assert!(value["data"][0]["isActive"].as_bool().unwrap());
    }
}
