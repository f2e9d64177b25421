//! Company CLI commands

use clap::Subcommand;

use super::common::{print_entity, run_create, run_delete, run_entity_list, run_update, CliContext, ListArgs};
use crate::api::ListQuery;
use crate::error::LedgerResult;
use crate::export::ExportFormat;
use crate::models::{Company, CompanyInput};
use crate::services::EntityService;

/// Company subcommands
#[derive(Subcommand)]
pub enum CompanyCommands {
    /// List companies of a group
    List {
        #[command(flatten)]
        args: ListArgs,
        #[arg(long)]
        active: Option<bool>,
        /// Only companies keeping books in this currency
        #[arg(long)]
        currency: Option<String>,
    },
    /// Show company details
    Show {
        /// Company code or ID
        company: String,
        #[arg(short, long)]
        group: Option<String>,
        #[arg(short, long, value_enum, default_value_t = ExportFormat::Table)]
        format: ExportFormat,
    },
    /// Create a company
    Create {
        /// Company code, unique within the group
        code: String,
        /// Legal name
        legal_name: String,
        /// Tax identifier
        #[arg(short, long)]
        tax_id: String,
        #[arg(long)]
        trade_name: Option<String>,
        /// Base currency (3-letter code)
        #[arg(short, long)]
        currency: Option<String>,
        #[arg(short, long)]
        group: Option<String>,
    },
    /// Update a company
    Update {
        /// Company code or ID
        company: String,
        #[arg(short, long)]
        group: Option<String>,
        #[arg(long)]
        code: Option<String>,
        #[arg(long)]
        legal_name: Option<String>,
        #[arg(long)]
        trade_name: Option<String>,
        #[arg(short, long)]
        tax_id: Option<String>,
        #[arg(short, long)]
        currency: Option<String>,
        #[arg(long)]
        active: Option<bool>,
    },
    /// Deactivate a company
    Delete {
        /// Company code or ID
        company: String,
        #[arg(short, long)]
        group: Option<String>,
    },
}

/// Find a company by code within the group scope (or by ID anywhere)
fn find_company(ctx: &CliContext, company: &str, group: Option<&str>) -> LedgerResult<Company> {
    let service = EntityService::<Company>::new(&ctx.client);
    let mut scope = ListQuery::default();
    if let Some(group_id) = ctx.optional_group_id(group)? {
        scope = scope.facet("economicGroupId", group_id);
    }
    service.find_in(company, scope)
}

/// Handle a company command
pub fn handle_company_command(ctx: &CliContext, cmd: CompanyCommands) -> LedgerResult<()> {
    match cmd {
        CompanyCommands::List {
            args,
            active,
            currency,
        } => {
            let mut query = args.query(&ctx.settings);
            if let Some(group_id) = ctx.optional_group_id(args.group.as_deref())? {
                query = query.facet("economicGroupId", group_id);
            }
            if let Some(active) = active {
                query = query.facet("isActive", active);
            }
            if let Some(currency) = currency {
                query = query.facet("baseCurrency", currency.to_uppercase());
            }
            run_entity_list::<Company>(ctx, &args, query)?;
        }

        CompanyCommands::Show {
            company,
            group,
            format,
        } => {
            let found = find_company(ctx, &company, group.as_deref())?;
            print_entity(ctx, &found, format)?;
        }

        CompanyCommands::Create {
            code,
            legal_name,
            tax_id,
            trade_name,
            currency,
            group,
        } => {
            let input = CompanyInput {
                economic_group_id: ctx.group_id(group.as_deref())?,
                code,
                legal_name,
                trade_name,
                tax_id,
                base_currency: currency,
                is_active: true,
            };
            run_create::<Company>(ctx, input)?;
        }

        CompanyCommands::Update {
            company,
            group,
            code,
            legal_name,
            trade_name,
            tax_id,
            currency,
            active,
        } => {
            let found = find_company(ctx, &company, group.as_deref())?;
            run_update(ctx, &found, |input| {
                let mut changed = false;
                if let Some(code) = code {
                    input.code = code;
                    changed = true;
                }
                if let Some(legal_name) = legal_name {
                    input.legal_name = legal_name;
                    changed = true;
                }
                if let Some(trade_name) = trade_name {
                    input.trade_name = Some(trade_name);
                    changed = true;
                }
                if let Some(tax_id) = tax_id {
                    input.tax_id = tax_id;
                    changed = true;
                }
                if let Some(currency) = currency {
                    input.base_currency = Some(currency);
                    changed = true;
                }
                if let Some(active) = active {
                    input.is_active = active;
                    changed = true;
                }
                Ok(changed)
            })?;
        }

        CompanyCommands::Delete { company, group } => {
            let found = find_company(ctx, &company, group.as_deref())?;
            run_delete(ctx, &found)?;
        }
    }

    Ok(())
}
