//! Audit logging
//!
//! Every mutation the local backend performs is recorded in an append-only
//! JSONL log with before/after values and a short diff summary.
//!
//! - `AuditEntry`: one operation on one entity.
//! - `AuditLogger`: appends entries to the log file and reads them back.
//! - `generate_diff`: summarizes top-level field changes.

mod diff;
mod entry;
mod logger;

pub use diff::generate_diff;
pub use entry::{AuditEntry, EntityType, Operation};
pub use logger::{AuditFilter, AuditLogger};
