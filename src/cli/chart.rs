//! Chart of accounts and ledger account CLI commands

use clap::Subcommand;

use super::common::{print_entity, run_create, run_delete, run_entity_list, run_update, CliContext, ListArgs};
use crate::api::ListQuery;
use crate::error::LedgerResult;
use crate::export::ExportFormat;
use crate::models::{Account, AccountInput, AccountType, ChartInput, ChartOfAccounts};
use crate::services::EntityService;

fn parse_account_type(s: &str) -> Result<AccountType, String> {
    AccountType::parse(s).ok_or_else(|| {
        format!(
            "Invalid account type: '{}'. Valid types: asset, liability, equity, revenue, expense",
            s
        )
    })
}

/// Chart of accounts subcommands
#[derive(Subcommand)]
pub enum ChartCommands {
    /// List charts of a group
    List {
        #[command(flatten)]
        args: ListArgs,
        #[arg(long)]
        active: Option<bool>,
    },
    /// Show chart details
    Show {
        /// Chart code or ID
        chart: String,
        #[arg(short, long)]
        group: Option<String>,
        #[arg(short, long, value_enum, default_value_t = ExportFormat::Table)]
        format: ExportFormat,
    },
    /// Create a chart of accounts
    Create {
        code: String,
        name: String,
        #[arg(short, long)]
        description: Option<String>,
        #[arg(short, long)]
        group: Option<String>,
    },
    /// Update a chart
    Update {
        /// Chart code or ID
        chart: String,
        #[arg(short, long)]
        group: Option<String>,
        #[arg(long)]
        code: Option<String>,
        #[arg(short, long)]
        name: Option<String>,
        #[arg(short, long)]
        description: Option<String>,
        #[arg(long)]
        active: Option<bool>,
    },
    /// Deactivate a chart
    Delete {
        /// Chart code or ID
        chart: String,
        #[arg(short, long)]
        group: Option<String>,
    },
}

/// Ledger account subcommands
#[derive(Subcommand)]
pub enum AccountCommands {
    /// List accounts of a chart
    List {
        #[command(flatten)]
        args: ListArgs,
        /// Chart code or ID
        #[arg(short, long)]
        chart: String,
        #[arg(short = 't', long = "type", value_parser = parse_account_type)]
        account_type: Option<AccountType>,
        /// Only children of this account (code or ID)
        #[arg(long)]
        parent: Option<String>,
        #[arg(long)]
        postable: Option<bool>,
    },
    /// Show account details
    Show {
        /// Account code or ID
        account: String,
        #[arg(short, long)]
        chart: String,
        #[arg(short, long, value_enum, default_value_t = ExportFormat::Table)]
        format: ExportFormat,
    },
    /// Create an account
    Create {
        /// Account code (digits, letters, `.` and `-`)
        code: String,
        name: String,
        #[arg(short, long)]
        chart: String,
        #[arg(short = 't', long = "type", value_parser = parse_account_type)]
        account_type: AccountType,
        /// Parent account code or ID; the level follows from it
        #[arg(short, long)]
        parent: Option<String>,
        /// Create a summary (non-postable) account
        #[arg(long)]
        summary: bool,
    },
    /// Update an account
    Update {
        /// Account code or ID
        account: String,
        #[arg(short, long)]
        chart: String,
        #[arg(long)]
        code: Option<String>,
        #[arg(short, long)]
        name: Option<String>,
        #[arg(short = 't', long = "type", value_parser = parse_account_type)]
        account_type: Option<AccountType>,
        #[arg(long)]
        postable: Option<bool>,
        #[arg(long)]
        active: Option<bool>,
    },
    /// Deactivate an account
    Delete {
        /// Account code or ID
        account: String,
        #[arg(short, long)]
        chart: String,
    },
}

fn find_chart(ctx: &CliContext, chart: &str, group: Option<&str>) -> LedgerResult<ChartOfAccounts> {
    let mut scope = ListQuery::default();
    if let Some(group_id) = ctx.optional_group_id(group)? {
        scope = scope.facet("economicGroupId", group_id);
    }
    EntityService::<ChartOfAccounts>::new(&ctx.client).find_in(chart, scope)
}

/// Handle a chart of accounts command
pub fn handle_chart_command(ctx: &CliContext, cmd: ChartCommands) -> LedgerResult<()> {
    match cmd {
        ChartCommands::List { args, active } => {
            let mut query = args.query(&ctx.settings);
            if let Some(group_id) = ctx.optional_group_id(args.group.as_deref())? {
                query = query.facet("economicGroupId", group_id);
            }
            if let Some(active) = active {
                query = query.facet("isActive", active);
            }
            run_entity_list::<ChartOfAccounts>(ctx, &args, query)?;
        }

        ChartCommands::Show {
            chart,
            group,
            format,
        } => {
            let found = find_chart(ctx, &chart, group.as_deref())?;
            print_entity(ctx, &found, format)?;
        }

        ChartCommands::Create {
            code,
            name,
            description,
            group,
        } => {
            let input = ChartInput {
                economic_group_id: ctx.group_id(group.as_deref())?,
                code,
                name,
                description,
                is_active: true,
            };
            run_create::<ChartOfAccounts>(ctx, input)?;
        }

        ChartCommands::Update {
            chart,
            group,
            code,
            name,
            description,
            active,
        } => {
            let found = find_chart(ctx, &chart, group.as_deref())?;
            run_update(ctx, &found, |input| {
                let changed =
                    code.is_some() || name.is_some() || description.is_some() || active.is_some();
                if let Some(code) = code {
                    input.code = code;
                }
                if let Some(name) = name {
                    input.name = name;
                }
                if description.is_some() {
                    input.description = description;
                }
                if let Some(active) = active {
                    input.is_active = active;
                }
                Ok(changed)
            })?;
        }

        ChartCommands::Delete { chart, group } => {
            let found = find_chart(ctx, &chart, group.as_deref())?;
            run_delete(ctx, &found)?;
        }
    }

    Ok(())
}

fn find_account(ctx: &CliContext, chart: &ChartOfAccounts, account: &str) -> LedgerResult<Account> {
    let scope = ListQuery::default().facet("chartOfAccountsId", chart.id);
    EntityService::<Account>::new(&ctx.client).find_in(account, scope)
}

/// Handle a ledger account command
pub fn handle_account_command(ctx: &CliContext, cmd: AccountCommands) -> LedgerResult<()> {
    match cmd {
        AccountCommands::List {
            args,
            chart,
            account_type,
            parent,
            postable,
        } => {
            let chart = find_chart(ctx, &chart, args.group.as_deref())?;
            let mut query = args.query(&ctx.settings).facet("chartOfAccountsId", chart.id);
            if let Some(account_type) = account_type {
                query = query.facet("accountType", account_type);
            }
            if let Some(parent) = parent {
                let parent = find_account(ctx, &chart, &parent)?;
                query = query.facet("parentId", parent.id);
            }
            if let Some(postable) = postable {
                query = query.facet("isPostable", postable);
            }
            run_entity_list::<Account>(ctx, &args, query)?;
        }

        AccountCommands::Show {
            account,
            chart,
            format,
        } => {
            let chart = find_chart(ctx, &chart, None)?;
            let found = find_account(ctx, &chart, &account)?;
            print_entity(ctx, &found, format)?;
        }

        AccountCommands::Create {
            code,
            name,
            chart,
            account_type,
            parent,
            summary,
        } => {
            let chart = find_chart(ctx, &chart, None)?;
            let mut input = AccountInput::new(chart.id, code, name, account_type);
            if let Some(parent) = parent {
                let parent = find_account(ctx, &chart, &parent)?;
                input.parent_id = Some(parent.id);
                input.level = parent.level + 1;
            }
            input.is_postable = !summary;
            run_create::<Account>(ctx, input)?;
        }

        AccountCommands::Update {
            account,
            chart,
            code,
            name,
            account_type,
            postable,
            active,
        } => {
            let chart = find_chart(ctx, &chart, None)?;
            let found = find_account(ctx, &chart, &account)?;
            run_update(ctx, &found, |input| {
                let changed = code.is_some()
                    || name.is_some()
                    || account_type.is_some()
                    || postable.is_some()
                    || active.is_some();
                if let Some(code) = code {
                    input.code = code;
                }
                if let Some(name) = name {
                    input.name = name;
                }
                if let Some(account_type) = account_type {
                    input.account_type = account_type;
                }
                if let Some(postable) = postable {
                    input.is_postable = postable;
                }
                if let Some(active) = active {
                    input.is_active = active;
                }
                Ok(changed)
            })?;
        }

        AccountCommands::Delete { account, chart } => {
            let chart = find_chart(ctx, &chart, None)?;
            let found = find_account(ctx, &chart, &account)?;
            run_delete(ctx, &found)?;
        }
    }

    Ok(())
}
