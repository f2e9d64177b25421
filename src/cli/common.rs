//! Pieces shared by every entity command
//!
//! `CliContext` carries the client and settings; the `run_*` helpers drive
//! the list controller, the form, and confirmed deletes the same way for all
//! resources.

use std::io;

use clap::Args;
use serde::Serialize;

use crate::api::{ApiClient, ListQuery};
use crate::config::{LedgerPaths, Locale, Settings};
use crate::controller::{AlwaysConfirm, Confirm, FormState, ListController, TerminalConfirm};
use crate::display::{
    format_details, format_field_errors, format_pagination, format_stats, format_table, Tabular,
};
use crate::error::{LedgerError, LedgerResult};
use crate::export::{export_csv, export_json, ExportFormat};
use crate::models::{EconomicGroup, EconomicGroupId};
use crate::services::{entity_stats, EntityService, StatCard};

/// Everything a command handler needs
pub struct CliContext {
    pub client: ApiClient,
    pub settings: Settings,
    pub paths: LedgerPaths,
    /// Skip confirmation prompts
    pub assume_yes: bool,
}

impl CliContext {
    pub fn locale(&self) -> Locale {
        self.settings.locale
    }

    pub fn confirmer(&self) -> Box<dyn Confirm> {
        if self.assume_yes {
            Box::new(AlwaysConfirm)
        } else {
            Box::new(TerminalConfirm)
        }
    }

    /// Resolve `--group` (code or id), falling back to the configured default
    pub fn group_id(&self, group: Option<&str>) -> LedgerResult<EconomicGroupId> {
        match group {
            Some(identifier) => Ok(EntityService::<EconomicGroup>::new(&self.client)
                .find(identifier)?
                .id),
            None => self.settings.economic_group.ok_or_else(|| {
                LedgerError::validation(
                    "No economic group given. Use --group or `ledgerdesk config --group`.",
                )
            }),
        }
    }

    /// Like `group_id` but `None` when neither flag nor default is set
    pub fn optional_group_id(&self, group: Option<&str>) -> LedgerResult<Option<EconomicGroupId>> {
        match group {
            Some(_) => self.group_id(group).map(Some),
            None => Ok(self.settings.economic_group),
        }
    }
}

/// Flags shared by every `list` subcommand
#[derive(Args, Debug, Clone, Default)]
pub struct ListArgs {
    /// Page number (starts at 1)
    #[arg(long, default_value_t = 1)]
    pub page: u32,
    /// Items per page (1-100); defaults to the configured page size
    #[arg(long)]
    pub limit: Option<u32>,
    /// Case-insensitive search text
    #[arg(short, long)]
    pub search: Option<String>,
    /// Economic group code or ID (group-scoped resources)
    #[arg(short, long)]
    pub group: Option<String>,
    /// Output format
    #[arg(short, long, value_enum, default_value_t = ExportFormat::Table)]
    pub format: ExportFormat,
    /// Print the stats cards above the table
    #[arg(long)]
    pub stats: bool,
}

impl ListArgs {
    /// Build the committed query; `facets` are added by the caller's scope
    pub fn query(&self, settings: &Settings) -> ListQuery {
        let mut query = ListQuery::new(self.page, self.limit.unwrap_or(settings.page_size));
        if let Some(search) = self.search.as_deref().filter(|s| !s.trim().is_empty()) {
            query = query.search(search.trim());
        }
        query
    }
}

/// Load one page through the list controller and print it
pub fn run_list<R>(
    ctx: &CliContext,
    args: &ListArgs,
    query: ListQuery,
    stats: impl Fn(&crate::api::Page<R>, Locale) -> Vec<StatCard>,
) -> LedgerResult<()>
where
    R: Tabular + Serialize,
{
    let service = EntityService::<R>::new(&ctx.client);
    let mut list =
        ListController::<R>::new(query.limit, ctx.settings.search_debounce()).with_query(query);
    list.refresh(&service);

    if let Some(err) = list.take_error() {
        return Err(err);
    }

    let page = crate::api::Page {
        data: list.items().to_vec(),
        pagination: *list.pagination(),
    };

    match args.format {
        ExportFormat::Json => export_json(&page, &mut io::stdout().lock())?,
        ExportFormat::Csv => {
            export_csv(&page.data, io::stdout().lock())?;
        }
        ExportFormat::Table => {
            let locale = ctx.locale();
            if args.stats {
                println!("{}", format_stats(&stats(&page, locale)));
                println!();
            }
            if page.data.is_empty() {
                println!("{}", format_table(&page.data, locale));
            } else {
                print!("{}", format_table(&page.data, locale));
                println!();
                println!("{}", format_pagination(&page.pagination));
            }
        }
    }
    Ok(())
}

/// `run_list` with the generic total/active cards
pub fn run_entity_list<R: Tabular + Serialize>(
    ctx: &CliContext,
    args: &ListArgs,
    query: ListQuery,
) -> LedgerResult<()> {
    run_list::<R>(ctx, args, query, entity_stats::<R>)
}

/// Print one entity in the chosen format
pub fn print_entity<R: Tabular + Serialize>(
    ctx: &CliContext,
    entity: &R,
    format: ExportFormat,
) -> LedgerResult<()> {
    match format {
        ExportFormat::Json => export_json(entity, &mut io::stdout().lock()),
        ExportFormat::Csv => export_csv(std::slice::from_ref(entity), io::stdout().lock()).map(|_| ()),
        ExportFormat::Table => {
            print!("{}", format_details(entity, ctx.locale()));
            Ok(())
        }
    }
}

/// Submit a form; field errors are echoed and turned into a validation error
pub fn submit_form<R: Tabular>(ctx: &CliContext, mut form: FormState<R>) -> LedgerResult<R> {
    let service = EntityService::<R>::new(&ctx.client);
    if let Some(saved) = form.submit(&service) {
        return Ok(saved);
    }

    if !form.errors().is_empty() {
        eprintln!("{} not saved:", R::LABEL);
        eprint!("{}", format_field_errors(form.errors()));
        return Err(LedgerError::invalid_fields(form.errors().clone()));
    }
    Err(LedgerError::Refused(
        form.alert().unwrap_or("submission failed").to_string(),
    ))
}

/// Create an entity and print what was saved
pub fn run_create<R: Tabular>(ctx: &CliContext, input: R::Input) -> LedgerResult<()> {
    let created = submit_form(ctx, FormState::<R>::create(input))?;
    println!("Created {}: {}", R::LABEL.to_lowercase(), created.display_name());
    println!("  ID: {}", created.id());
    Ok(())
}

/// Edit an entity: pre-populate from the server, apply overrides, submit
pub fn run_update<R: Tabular>(
    ctx: &CliContext,
    existing: &R,
    overrides: impl FnOnce(&mut R::Input) -> LedgerResult<bool>,
) -> LedgerResult<()> {
    let mut form = FormState::<R>::edit(existing);
    if !overrides(&mut form.input)? {
        println!("No changes specified.");
        return Ok(());
    }
    let updated = submit_form(ctx, form)?;
    println!("Updated {}: {}", R::LABEL.to_lowercase(), updated.display_name());
    Ok(())
}

/// Confirmed delete; soft-deleting resources report the deactivation
pub fn run_delete<R: Tabular>(ctx: &CliContext, existing: &R) -> LedgerResult<()> {
    let prompt = if R::SOFT_DELETE {
        format!("Deactivate {} {}?", R::LABEL.to_lowercase(), existing.display_name())
    } else {
        format!(
            "Delete {} {}? This cannot be undone.",
            R::LABEL.to_lowercase(),
            existing.display_name()
        )
    };
    if !ctx.confirmer().confirm(&prompt) {
        println!("Cancelled.");
        return Ok(());
    }

    let service = EntityService::<R>::new(&ctx.client);
    match service.delete(existing.id())? {
        Some(_) => println!("Deactivated {}: {}", R::LABEL.to_lowercase(), existing.display_name()),
        None => println!("Deleted {}: {}", R::LABEL.to_lowercase(), existing.display_name()),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_args_query() {
        let settings = Settings::default();
        let args = ListArgs {
            page: 2,
            search: Some("  acme ".into()),
            ..ListArgs::default()
        };
        let query = args.query(&settings);
        assert_eq!(query.page, 2);
        assert_eq!(query.limit, 10);
        assert_eq!(query.search.as_deref(), Some("acme"));

        let blank = ListArgs {
            search: Some("   ".into()),
            ..ListArgs::default()
        };
        assert!(blank.query(&settings).search.is_none());
    }
}
