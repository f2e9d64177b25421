//! User/company permission CLI commands

use clap::Subcommand;

use super::common::{print_entity, run_create, run_delete, run_entity_list, run_update, CliContext, ListArgs};
use crate::api::ListQuery;
use crate::error::LedgerResult;
use crate::export::ExportFormat;
use crate::models::{
    Company, CompanyId, PermissionId, PermissionInput, PermissionRole, UserCompanyPermission,
};
use crate::services::EntityService;

fn parse_role(s: &str) -> Result<PermissionRole, String> {
    PermissionRole::parse(s)
        .ok_or_else(|| format!("Invalid role: '{}'. Valid roles: admin, accountant, viewer", s))
}

/// Permission subcommands
#[derive(Subcommand)]
pub enum PermissionCommands {
    /// List permissions
    List {
        #[command(flatten)]
        args: ListArgs,
        #[arg(short, long)]
        user: Option<String>,
        /// Company code or ID
        #[arg(short, long)]
        company: Option<String>,
        #[arg(short, long, value_parser = parse_role)]
        role: Option<PermissionRole>,
    },
    /// Show a permission
    Show {
        id: PermissionId,
        #[arg(short, long, value_enum, default_value_t = ExportFormat::Table)]
        format: ExportFormat,
    },
    /// Grant a user a role on a company
    Grant {
        user: String,
        /// Company code or ID
        company: String,
        #[arg(short, long, value_parser = parse_role, default_value = "viewer")]
        role: PermissionRole,
    },
    /// Change the role of a permission
    Update {
        id: PermissionId,
        #[arg(short, long, value_parser = parse_role)]
        role: PermissionRole,
    },
    /// Revoke a permission
    Revoke { id: PermissionId },
}

fn company_id(ctx: &CliContext, company: &str) -> LedgerResult<CompanyId> {
    let mut scope = ListQuery::default();
    if let Some(group_id) = ctx.settings.economic_group {
        scope = scope.facet("economicGroupId", group_id);
    }
    Ok(EntityService::<Company>::new(&ctx.client)
        .find_in(company, scope)?
        .id)
}

/// Handle a permission command
pub fn handle_permission_command(ctx: &CliContext, cmd: PermissionCommands) -> LedgerResult<()> {
    let service = EntityService::<UserCompanyPermission>::new(&ctx.client);

    match cmd {
        PermissionCommands::List {
            args,
            user,
            company,
            role,
        } => {
            let mut query = args.query(&ctx.settings);
            if let Some(user) = user {
                query = query.facet("userId", user);
            }
            if let Some(company) = company {
                query = query.facet("companyId", company_id(ctx, &company)?);
            }
            if let Some(role) = role {
                query = query.facet("role", role);
            }
            run_entity_list::<UserCompanyPermission>(ctx, &args, query)?;
        }

        PermissionCommands::Show { id, format } => {
            let found = service.get(id)?;
            print_entity(ctx, &found, format)?;
        }

        PermissionCommands::Grant {
            user,
            company,
            role,
        } => {
            let input = PermissionInput {
                user_id: user,
                company_id: company_id(ctx, &company)?,
                role,
            };
            run_create::<UserCompanyPermission>(ctx, input)?;
        }

        PermissionCommands::Update { id, role } => {
            let found = service.get(id)?;
            run_update(ctx, &found, |input| {
                let changed = input.role != role;
                input.role = role;
                Ok(changed)
            })?;
        }

        PermissionCommands::Revoke { id } => {
            let found = service.get(id)?;
            run_delete(ctx, &found)?;
        }
    }

    Ok(())
}
