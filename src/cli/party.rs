//! Customer and supplier CLI commands
//!
//! Both resources share one shape, so one subcommand enum serves both.

use clap::Subcommand;
use serde::Serialize;

use super::common::{print_entity, run_create, run_delete, run_entity_list, run_update, CliContext, ListArgs};
use crate::api::ListQuery;
use crate::display::Tabular;
use crate::error::LedgerResult;
use crate::export::ExportFormat;
use crate::models::{PartyInput, Resource};
use crate::services::EntityService;

/// Customer/supplier subcommands
#[derive(Subcommand)]
pub enum PartyCommands {
    /// List entries of a group
    List {
        #[command(flatten)]
        args: ListArgs,
        #[arg(long)]
        active: Option<bool>,
    },
    /// Show details
    Show {
        /// Code or ID
        party: String,
        #[arg(short, long)]
        group: Option<String>,
        #[arg(short, long, value_enum, default_value_t = ExportFormat::Table)]
        format: ExportFormat,
    },
    /// Create an entry
    Create {
        /// Code, unique within the group
        code: String,
        /// Name
        name: String,
        #[arg(short, long)]
        tax_id: Option<String>,
        #[arg(short, long)]
        email: Option<String>,
        #[arg(short, long)]
        phone: Option<String>,
        #[arg(short, long)]
        group: Option<String>,
    },
    /// Update an entry
    Update {
        /// Code or ID
        party: String,
        #[arg(short, long)]
        group: Option<String>,
        #[arg(long)]
        code: Option<String>,
        #[arg(short, long)]
        name: Option<String>,
        #[arg(short, long)]
        tax_id: Option<String>,
        #[arg(short, long)]
        email: Option<String>,
        #[arg(short, long)]
        phone: Option<String>,
        #[arg(long)]
        active: Option<bool>,
    },
    /// Deactivate an entry
    Delete {
        /// Code or ID
        party: String,
        #[arg(short, long)]
        group: Option<String>,
    },
}

fn find_party<R>(ctx: &CliContext, party: &str, group: Option<&str>) -> LedgerResult<R>
where
    R: Tabular + Resource<Input = PartyInput>,
{
    let mut scope = ListQuery::default();
    if let Some(group_id) = ctx.optional_group_id(group)? {
        scope = scope.facet("economicGroupId", group_id);
    }
    EntityService::<R>::new(&ctx.client).find_in(party, scope)
}

/// Handle a customer or supplier command
pub fn handle_party_command<R>(ctx: &CliContext, cmd: PartyCommands) -> LedgerResult<()>
where
    R: Tabular + Resource<Input = PartyInput> + Serialize,
{
    match cmd {
        PartyCommands::List { args, active } => {
            let mut query = args.query(&ctx.settings);
            if let Some(group_id) = ctx.optional_group_id(args.group.as_deref())? {
                query = query.facet("economicGroupId", group_id);
            }
            if let Some(active) = active {
                query = query.facet("isActive", active);
            }
            run_entity_list::<R>(ctx, &args, query)?;
        }

        PartyCommands::Show {
            party,
            group,
            format,
        } => {
            let found = find_party::<R>(ctx, &party, group.as_deref())?;
            print_entity(ctx, &found, format)?;
        }

        PartyCommands::Create {
            code,
            name,
            tax_id,
            email,
            phone,
            group,
        } => {
            let mut input = PartyInput::new(ctx.group_id(group.as_deref())?, code, name);
            input.tax_id = tax_id;
            input.email = email;
            input.phone = phone;
            run_create::<R>(ctx, input)?;
        }

        PartyCommands::Update {
            party,
            group,
            code,
            name,
            tax_id,
            email,
            phone,
            active,
        } => {
            let found = find_party::<R>(ctx, &party, group.as_deref())?;
            run_update(ctx, &found, |input| {
                let changed = code.is_some()
                    || name.is_some()
                    || tax_id.is_some()
                    || email.is_some()
                    || phone.is_some()
                    || active.is_some();
                if let Some(code) = code {
                    input.code = code;
                }
                if let Some(name) = name {
                    input.name = name;
                }
                if tax_id.is_some() {
                    input.tax_id = tax_id;
                }
                if email.is_some() {
                    input.email = email;
                }
                if phone.is_some() {
                    input.phone = phone;
                }
                if let Some(active) = active {
                    input.is_active = active;
                }
                Ok(changed)
            })?;
        }

        PartyCommands::Delete { party, group } => {
            let found = find_party::<R>(ctx, &party, group.as_deref())?;
            run_delete(ctx, &found)?;
        }
    }

    Ok(())
}
