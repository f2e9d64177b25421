//! Accounting period CLI commands
//!
//! Close, reopen and delete run through the confirmed transition flow and
//! print the reloaded list afterwards.

use chrono::NaiveDate;
use clap::Subcommand;

use super::common::{print_entity, run_create, run_list, run_update, CliContext, ListArgs};
use crate::api::ListQuery;
use crate::controller::{run_transition, ListController, Outcome, PeriodRowActions, Transition};
use crate::display::format_table;
use crate::error::{LedgerError, LedgerResult};
use crate::export::ExportFormat;
use crate::models::period::rules;
use crate::models::{AccountingPeriod, EconomicGroupId, PeriodInput, PeriodType};
use crate::services::{period_stats, PeriodService};

fn parse_period_type(s: &str) -> Result<PeriodType, String> {
    PeriodType::parse(s).ok_or_else(|| {
        format!(
            "Invalid period type: '{}'. Valid types: fiscal-year, quarter, month",
            s
        )
    })
}

/// Accounting period subcommands
#[derive(Subcommand)]
pub enum PeriodCommands {
    /// List periods of a group
    List {
        #[command(flatten)]
        args: ListArgs,
        #[arg(short = 't', long = "type", value_parser = parse_period_type)]
        period_type: Option<PeriodType>,
        #[arg(short, long)]
        year: Option<i32>,
        /// Only closed (true) or open (false) periods
        #[arg(long)]
        closed: Option<bool>,
    },
    /// Show period details
    Show {
        /// Label (`2025-03`, `2025-Q1`, `FY2025`) or ID
        period: String,
        #[arg(short, long)]
        group: Option<String>,
        #[arg(short, long, value_enum, default_value_t = ExportFormat::Table)]
        format: ExportFormat,
    },
    /// Create a period
    Create {
        #[arg(short = 't', long = "type", value_parser = parse_period_type)]
        period_type: PeriodType,
        /// Fiscal year
        #[arg(short, long)]
        year: i32,
        /// Month (1-12) for MONTH periods
        #[arg(short, long)]
        month: Option<u32>,
        /// Quarter (1-4) for QUARTER periods
        #[arg(short, long)]
        quarter: Option<u32>,
        /// Override the computed start date
        #[arg(long)]
        start: Option<NaiveDate>,
        /// Override the computed end date
        #[arg(long)]
        end: Option<NaiveDate>,
        #[arg(short, long)]
        group: Option<String>,
    },
    /// Change the dates of an open period
    Update {
        /// Label or ID
        period: String,
        #[arg(short, long)]
        group: Option<String>,
        #[arg(long)]
        start: Option<NaiveDate>,
        #[arg(long)]
        end: Option<NaiveDate>,
    },
    /// Delete an open period
    Delete {
        /// Label or ID
        period: String,
        #[arg(short, long)]
        group: Option<String>,
    },
    /// Close an open period
    Close {
        /// Label or ID
        period: String,
        #[arg(short, long)]
        group: Option<String>,
    },
    /// Reopen a closed period
    Reopen {
        /// Label or ID
        period: String,
        #[arg(short, long)]
        group: Option<String>,
    },
}

fn group_scope(ctx: &CliContext, group: Option<&str>) -> LedgerResult<ListQuery> {
    let mut scope = ListQuery::new(1, ctx.settings.page_size);
    if let Some(group_id) = ctx.optional_group_id(group)? {
        scope = scope.facet("economicGroupId", group_id);
    }
    Ok(scope)
}

/// Build the create body from the type and its ordinal
fn period_input(
    group_id: EconomicGroupId,
    period_type: PeriodType,
    year: i32,
    month: Option<u32>,
    quarter: Option<u32>,
) -> LedgerResult<PeriodInput> {
    let input = match period_type {
        PeriodType::Month => {
            let month = month.ok_or_else(|| {
                LedgerError::validation("MONTH periods need --month (1-12)")
            })?;
            PeriodInput::month(group_id, year, month)
        }
        PeriodType::Quarter => {
            let quarter = quarter.ok_or_else(|| {
                LedgerError::validation("QUARTER periods need --quarter (1-4)")
            })?;
            PeriodInput::quarter(group_id, year, quarter)
        }
        PeriodType::FiscalYear => PeriodInput::fiscal_year(group_id, year),
    };
    input.ok_or_else(|| LedgerError::validation(format!("No such {} in {}", period_type, year)))
}

/// Run a transition and show the reloaded list of the same group
fn transition(
    ctx: &CliContext,
    period: &str,
    group: Option<&str>,
    kind: Transition,
) -> LedgerResult<()> {
    let service = PeriodService::new(&ctx.client);
    let scope = group_scope(ctx, group)?;
    let found = service.find_in(period, scope.clone())?;

    let scope = scope.facet("economicGroupId", found.economic_group_id);
    let mut list = ListController::<AccountingPeriod>::new(scope.limit, ctx.settings.search_debounce())
        .with_query(scope);

    let confirm = ctx.confirmer();
    match run_transition(&service, &found, kind, confirm.as_ref(), Some(&mut list)) {
        Outcome::Applied(_) => {
            let verb = match kind {
                Transition::Close => "Closed",
                Transition::Reopen => "Reopened",
                Transition::Delete => "Deleted",
            };
            println!("{} period {}", verb, found.label());
            println!();
            println!("{}", format_table(list.items(), ctx.locale()).trim_end());
            Ok(())
        }
        Outcome::Cancelled => {
            println!("Cancelled.");
            Ok(())
        }
        Outcome::Blocked => {
            let (rule, message) = match kind {
                Transition::Close => (
                    rules::ALREADY_CLOSED,
                    format!("Period {} is already closed", found.label()),
                ),
                Transition::Reopen => (
                    rules::NOT_CLOSED,
                    format!("Period {} is not closed", found.label()),
                ),
                Transition::Delete => (
                    rules::CLOSED,
                    format!("Period {} is closed; reopen it before deleting", found.label()),
                ),
            };
            Err(LedgerError::BusinessRule {
                rule: rule.to_string(),
                message,
            })
        }
        Outcome::Failed(message) => Err(LedgerError::Refused(message)),
    }
}

/// Handle an accounting period command
pub fn handle_period_command(ctx: &CliContext, cmd: PeriodCommands) -> LedgerResult<()> {
    let service = PeriodService::new(&ctx.client);

    match cmd {
        PeriodCommands::List {
            args,
            period_type,
            year,
            closed,
        } => {
            let mut query = args.query(&ctx.settings);
            if let Some(group_id) = ctx.optional_group_id(args.group.as_deref())? {
                query = query.facet("economicGroupId", group_id);
            }
            if let Some(period_type) = period_type {
                query = query.facet("type", period_type);
            }
            if let Some(year) = year {
                query = query.facet("fiscalYear", year);
            }
            if let Some(closed) = closed {
                query = query.facet("closed", closed);
            }
            run_list::<AccountingPeriod>(ctx, &args, query, period_stats)?;
        }

        PeriodCommands::Show {
            period,
            group,
            format,
        } => {
            let found = service.find_in(&period, group_scope(ctx, group.as_deref())?)?;
            print_entity(ctx, &found, format)?;
        }

        PeriodCommands::Create {
            period_type,
            year,
            month,
            quarter,
            start,
            end,
            group,
        } => {
            let group_id = ctx.group_id(group.as_deref())?;
            let mut input = period_input(group_id, period_type, year, month, quarter)?;
            if let Some(start) = start {
                input.start_date = start;
            }
            if let Some(end) = end {
                input.end_date = end;
            }
            run_create::<AccountingPeriod>(ctx, input)?;
        }

        PeriodCommands::Update {
            period,
            group,
            start,
            end,
        } => {
            let found = service.find_in(&period, group_scope(ctx, group.as_deref())?)?;
            if !PeriodRowActions::for_period(&found).can_edit {
                return Err(LedgerError::BusinessRule {
                    rule: rules::CLOSED.to_string(),
                    message: format!("Period {} is closed and cannot be modified", found.label()),
                });
            }
            run_update(ctx, &found, |input| {
                let changed = start.is_some() || end.is_some();
                if let Some(start) = start {
                    input.start_date = start;
                }
                if let Some(end) = end {
                    input.end_date = end;
                }
                Ok(changed)
            })?;
        }

        PeriodCommands::Delete { period, group } => {
            transition(ctx, &period, group.as_deref(), Transition::Delete)?;
        }

        PeriodCommands::Close { period, group } => {
            transition(ctx, &period, group.as_deref(), Transition::Close)?;
        }

        PeriodCommands::Reopen { period, group } => {
            transition(ctx, &period, group.as_deref(), Transition::Reopen)?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_period_input_requires_ordinal() {
        let group = EconomicGroupId::new();
        assert!(period_input(group, PeriodType::Month, 2025, None, None).is_err());
        assert!(period_input(group, PeriodType::Month, 2025, Some(13), None).is_err());

        let march = period_input(group, PeriodType::Month, 2025, Some(3), None).unwrap();
        assert_eq!(march.end_date, NaiveDate::from_ymd_opt(2025, 3, 31).unwrap());

        let q2 = period_input(group, PeriodType::Quarter, 2025, None, Some(2)).unwrap();
        assert_eq!(q2.start_date, NaiveDate::from_ymd_opt(2025, 4, 1).unwrap());
    }

    #[test]
    fn test_parse_period_type() {
        assert_eq!(parse_period_type("fiscal-year"), Ok(PeriodType::FiscalYear));
        assert!(parse_period_type("week").is_err());
    }
}
