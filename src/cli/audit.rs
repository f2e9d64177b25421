//! Audit trail CLI command
//!
//! Reads the append-only log written by the local backend.

use clap::Args;

use super::common::CliContext;
use crate::audit::{AuditFilter, AuditLogger, EntityType};
use crate::display::format_audit;
use crate::error::LedgerResult;

fn parse_entity_type(s: &str) -> Result<EntityType, String> {
    EntityType::parse(s).ok_or_else(|| format!("Unknown entity type: '{}'", s))
}

/// Audit log filters
#[derive(Args)]
pub struct AuditArgs {
    /// Entity type (group, company, customer, supplier, currency, rate, period, chart, account, permission)
    #[arg(short, long, value_parser = parse_entity_type)]
    pub entity: Option<EntityType>,
    /// Entity ID or ID prefix
    #[arg(short, long)]
    pub id: Option<String>,
    /// Most recent entries to show
    #[arg(short, long, default_value_t = 20)]
    pub limit: usize,
}

/// Handle the audit command
pub fn handle_audit_command(ctx: &CliContext, args: AuditArgs) -> LedgerResult<()> {
    let logger = AuditLogger::new(ctx.paths.audit_log());
    if !logger.exists() {
        println!("No audit entries found.");
        return Ok(());
    }

    let filter = AuditFilter {
        entity_type: args.entity,
        entity_id: args.id,
        limit: Some(args.limit),
    };
    let entries = logger.read_filtered(&filter)?;

    println!("{}", format_audit(&entries).trim_end());
    Ok(())
}
