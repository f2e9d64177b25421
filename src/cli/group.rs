//! Economic group CLI commands

use clap::Subcommand;

use super::common::{print_entity, run_create, run_delete, run_entity_list, run_update, CliContext, ListArgs};
use crate::error::LedgerResult;
use crate::export::ExportFormat;
use crate::models::{EconomicGroup, EconomicGroupInput};
use crate::services::EntityService;

/// Economic group subcommands
#[derive(Subcommand)]
pub enum GroupCommands {
    /// List economic groups
    List {
        #[command(flatten)]
        args: ListArgs,
        /// Only active (true) or inactive (false) groups
        #[arg(long)]
        active: Option<bool>,
    },
    /// Show group details
    Show {
        /// Group code or ID
        group: String,
        #[arg(short, long, value_enum, default_value_t = ExportFormat::Table)]
        format: ExportFormat,
    },
    /// Create a new economic group
    Create {
        /// Unique group code
        code: String,
        /// Group name
        name: String,
        #[arg(short, long)]
        description: Option<String>,
        /// Create the group inactive
        #[arg(long)]
        inactive: bool,
    },
    /// Update a group
    Update {
        /// Group code or ID
        group: String,
        #[arg(long)]
        code: Option<String>,
        #[arg(short, long)]
        name: Option<String>,
        #[arg(short, long)]
        description: Option<String>,
        #[arg(long)]
        active: Option<bool>,
    },
    /// Deactivate a group
    Delete {
        /// Group code or ID
        group: String,
    },
}

/// Handle an economic group command
pub fn handle_group_command(ctx: &CliContext, cmd: GroupCommands) -> LedgerResult<()> {
    let service = EntityService::<EconomicGroup>::new(&ctx.client);

    match cmd {
        GroupCommands::List { args, active } => {
            let mut query = args.query(&ctx.settings);
            if let Some(active) = active {
                query = query.facet("isActive", active);
            }
            run_entity_list::<EconomicGroup>(ctx, &args, query)?;
        }

        GroupCommands::Show { group, format } => {
            let found = service.find(&group)?;
            print_entity(ctx, &found, format)?;
        }

        GroupCommands::Create {
            code,
            name,
            description,
            inactive,
        } => {
            let mut input = EconomicGroupInput::new(code, name);
            input.description = description;
            input.is_active = !inactive;
            run_create::<EconomicGroup>(ctx, input)?;
        }

        GroupCommands::Update {
            group,
            code,
            name,
            description,
            active,
        } => {
            let found = service.find(&group)?;
            run_update(ctx, &found, |input| {
                let changed = code.is_some() || name.is_some() || description.is_some() || active.is_some();
                if let Some(code) = code {
                    input.code = code;
                }
                if let Some(name) = name {
                    input.name = name;
                }
                if let Some(description) = description {
                    input.description = Some(description);
                }
                if let Some(active) = active {
                    input.is_active = active;
                }
                Ok(changed)
            })?;
        }

        GroupCommands::Delete { group } => {
            let found = service.find(&group)?;
            run_delete(ctx, &found)?;
        }
    }

    Ok(())
}
