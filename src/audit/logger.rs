//! Audit logger for the append-only audit log
//!
//! Each entry is written as a single JSON line and flushed immediately.

use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::PathBuf;

use crate::error::{LedgerError, LedgerResult};

use super::entry::{AuditEntry, EntityType};

/// Filter applied when reading the audit log back
#[derive(Debug, Clone, Default)]
pub struct AuditFilter {
    pub entity_type: Option<EntityType>,
    /// Matches the full entity id or a prefix of it
    pub entity_id: Option<String>,
    pub limit: Option<usize>,
}

impl AuditFilter {
    fn matches(&self, entry: &AuditEntry) -> bool {
        self.entity_type.map_or(true, |t| entry.entity_type == t)
            && self
                .entity_id
                .as_deref()
                .map_or(true, |id| entry.entity_id.starts_with(id))
    }
}

/// Writes audit entries to a line-delimited JSON file
pub struct AuditLogger {
    log_path: PathBuf,
}

impl AuditLogger {
    pub fn new(log_path: PathBuf) -> Self {
        Self { log_path }
    }

    /// Append an entry and flush
    pub fn log(&self, entry: &AuditEntry) -> LedgerResult<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_path)
            .map_err(|e| LedgerError::Io(format!("Failed to open audit log: {}", e)))?;

        let json = serde_json::to_string(entry)
            .map_err(|e| LedgerError::Json(format!("Failed to serialize audit entry: {}", e)))?;

        writeln!(file, "{}", json)
            .map_err(|e| LedgerError::Io(format!("Failed to write audit entry: {}", e)))?;

        file.flush()
            .map_err(|e| LedgerError::Io(format!("Failed to flush audit log: {}", e)))?;

        log::debug!(
            "audit: {} {} {}",
            entry.operation,
            entry.entity_type,
            entry.entity_id
        );
        Ok(())
    }

    /// Read all entries, oldest first
    pub fn read_all(&self) -> LedgerResult<Vec<AuditEntry>> {
        if !self.log_path.exists() {
            return Ok(Vec::new());
        }

        let file = File::open(&self.log_path)
            .map_err(|e| LedgerError::Io(format!("Failed to open audit log: {}", e)))?;

        let reader = BufReader::new(file);
        let mut entries = Vec::new();

        for (line_num, line) in reader.lines().enumerate() {
            let line = line.map_err(|e| {
                LedgerError::Io(format!("Failed to read audit log line {}: {}", line_num + 1, e))
            })?;

            if line.trim().is_empty() {
                continue;
            }

            let entry: AuditEntry = serde_json::from_str(&line).map_err(|e| {
                LedgerError::Json(format!(
                    "Failed to parse audit entry at line {}: {}",
                    line_num + 1,
                    e
                ))
            })?;

            entries.push(entry);
        }

        Ok(entries)
    }

    /// Entries matching the filter; with a limit, only the most recent ones
    pub fn read_filtered(&self, filter: &AuditFilter) -> LedgerResult<Vec<AuditEntry>> {
        let mut entries: Vec<AuditEntry> = self
            .read_all()?
            .into_iter()
            .filter(|e| filter.matches(e))
            .collect();
        if let Some(limit) = filter.limit {
            let start = entries.len().saturating_sub(limit);
            entries.drain(..start);
        }
        Ok(entries)
    }

    pub fn exists(&self) -> bool {
        self.log_path.exists()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::entry::Operation;
    use serde_json::json;
    use tempfile::TempDir;

    fn create_test_logger() -> (AuditLogger, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let log_path = temp_dir.path().join("audit.log");
        let logger = AuditLogger::new(log_path);
        (logger, temp_dir)
    }

    #[test]
    fn test_log_and_read() {
        let (logger, _temp) = create_test_logger();
        let entry = AuditEntry::create(
            EntityType::Company,
            "cmp-1",
            Some("Acme".to_string()),
            &json!({"code": "ACME"}),
        );

        logger.log(&entry).unwrap();

        let entries = logger.read_all().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].operation, Operation::Create);
        assert_eq!(entries[0].entity_type, EntityType::Company);
    }

    #[test]
    fn test_filter_by_type_and_limit() {
        let (logger, _temp) = create_test_logger();

        for i in 0..6 {
            let entity_type = if i % 2 == 0 {
                EntityType::AccountingPeriod
            } else {
                EntityType::Currency
            };
            let entry = AuditEntry::create(entity_type, format!("id-{}", i), None, &json!({}));
            logger.log(&entry).unwrap();
        }

        let filter = AuditFilter {
            entity_type: Some(EntityType::AccountingPeriod),
            entity_id: None,
            limit: Some(2),
        };
        let entries = logger.read_filtered(&filter).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].entity_id, "id-2");
        assert_eq!(entries[1].entity_id, "id-4");
    }

    #[test]
    fn test_filter_by_id_prefix() {
        let (logger, _temp) = create_test_logger();
        logger
            .log(&AuditEntry::create(EntityType::Company, "abc-1", None, &json!({})))
            .unwrap();
        logger
            .log(&AuditEntry::create(EntityType::Company, "xyz-2", None, &json!({})))
            .unwrap();

        let filter = AuditFilter {
            entity_id: Some("abc".into()),
            ..Default::default()
        };
        assert_eq!(logger.read_filtered(&filter).unwrap().len(), 1);
    }

    #[test]
    fn test_empty_log() {
        let (logger, _temp) = create_test_logger();

        assert!(!logger.exists());
        assert!(logger.read_all().unwrap().is_empty());
    }

    #[test]
    fn test_survives_restart() {
        let (logger, temp) = create_test_logger();
        logger
            .log(&AuditEntry::create(EntityType::Currency, "cur", None, &json!({})))
            .unwrap();

        let logger2 = AuditLogger::new(temp.path().join("audit.log"));
        assert_eq!(logger2.read_all().unwrap().len(), 1);
    }
}
