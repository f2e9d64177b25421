//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the API client and controllers.

pub mod audit;
pub mod chart;
pub mod common;
pub mod company;
pub mod currency;
pub mod group;
pub mod party;
pub mod period;
pub mod permission;

pub use audit::{handle_audit_command, AuditArgs};
pub use chart::{handle_account_command, handle_chart_command, AccountCommands, ChartCommands};
pub use common::{CliContext, ListArgs};
pub use company::{handle_company_command, CompanyCommands};
pub use currency::{handle_currency_command, handle_rate_command, CurrencyCommands, RateCommands};
pub use group::{handle_group_command, GroupCommands};
pub use party::{handle_party_command, PartyCommands};
pub use period::{handle_period_command, PeriodCommands};
pub use permission::{handle_permission_command, PermissionCommands};
