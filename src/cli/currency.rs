//! Currency and exchange rate CLI commands

use chrono::NaiveDate;
use clap::Subcommand;

use super::common::{print_entity, run_create, run_delete, run_entity_list, run_update, CliContext, ListArgs};
use crate::api::ListQuery;
use crate::error::LedgerResult;
use crate::export::ExportFormat;
use crate::models::{Currency, CurrencyInput, ExchangeRate, ExchangeRateInput, RateType};
use crate::services::EntityService;

fn parse_rate_type(s: &str) -> Result<RateType, String> {
    RateType::parse(s).ok_or_else(|| {
        format!(
            "Invalid rate type: '{}'. Valid types: spot, average, closing",
            s
        )
    })
}

/// Currency subcommands
#[derive(Subcommand)]
pub enum CurrencyCommands {
    /// List currencies
    List {
        #[command(flatten)]
        args: ListArgs,
        #[arg(long)]
        active: Option<bool>,
    },
    /// Show currency details
    Show {
        /// ISO code or ID
        currency: String,
        #[arg(short, long, value_enum, default_value_t = ExportFormat::Table)]
        format: ExportFormat,
    },
    /// Add a currency
    Create {
        /// ISO 4217 code (e.g. COP)
        code: String,
        name: String,
        #[arg(short, long, default_value = "$")]
        symbol: String,
        /// Minor unit digits
        #[arg(short, long, default_value_t = 2)]
        decimals: u8,
    },
    /// Update a currency
    Update {
        /// ISO code or ID
        currency: String,
        #[arg(short, long)]
        name: Option<String>,
        #[arg(short, long)]
        symbol: Option<String>,
        #[arg(short, long)]
        decimals: Option<u8>,
        #[arg(long)]
        active: Option<bool>,
    },
    /// Deactivate a currency
    Delete {
        /// ISO code or ID
        currency: String,
    },
}

/// Exchange rate subcommands
#[derive(Subcommand)]
pub enum RateCommands {
    /// List exchange rates of a group
    List {
        #[command(flatten)]
        args: ListArgs,
        #[arg(long)]
        from: Option<String>,
        #[arg(long)]
        to: Option<String>,
        #[arg(long, value_parser = parse_rate_type)]
        rate_type: Option<RateType>,
    },
    /// Show a rate
    Show {
        /// `FROM/TO@YYYY-MM-DD` or ID
        rate: String,
        #[arg(short, long)]
        group: Option<String>,
        #[arg(short, long, value_enum, default_value_t = ExportFormat::Table)]
        format: ExportFormat,
    },
    /// Record a rate
    Create {
        /// Source currency
        from: String,
        /// Target currency
        to: String,
        /// Units of target per unit of source
        rate: f64,
        /// Effective date (YYYY-MM-DD)
        #[arg(short, long)]
        date: NaiveDate,
        #[arg(short = 't', long, value_parser = parse_rate_type, default_value = "spot")]
        rate_type: RateType,
        #[arg(short, long)]
        group: Option<String>,
    },
    /// Update a rate
    Update {
        /// `FROM/TO@YYYY-MM-DD` or ID
        rate: String,
        #[arg(short, long)]
        group: Option<String>,
        /// New rate value
        #[arg(long)]
        value: Option<f64>,
        #[arg(short, long)]
        date: Option<NaiveDate>,
        #[arg(short = 't', long, value_parser = parse_rate_type)]
        rate_type: Option<RateType>,
    },
    /// Delete a rate
    Delete {
        /// `FROM/TO@YYYY-MM-DD` or ID
        rate: String,
        #[arg(short, long)]
        group: Option<String>,
    },
}

/// Handle a currency command
pub fn handle_currency_command(ctx: &CliContext, cmd: CurrencyCommands) -> LedgerResult<()> {
    let service = EntityService::<Currency>::new(&ctx.client);

    match cmd {
        CurrencyCommands::List { args, active } => {
            let mut query = args.query(&ctx.settings);
            if let Some(active) = active {
                query = query.facet("isActive", active);
            }
            run_entity_list::<Currency>(ctx, &args, query)?;
        }

        CurrencyCommands::Show { currency, format } => {
            let found = service.find(&currency)?;
            print_entity(ctx, &found, format)?;
        }

        CurrencyCommands::Create {
            code,
            name,
            symbol,
            decimals,
        } => {
            run_create::<Currency>(ctx, CurrencyInput::new(&code, &name, &symbol, decimals))?;
        }

        CurrencyCommands::Update {
            currency,
            name,
            symbol,
            decimals,
            active,
        } => {
            let found = service.find(&currency)?;
            run_update(ctx, &found, |input| {
                let changed =
                    name.is_some() || symbol.is_some() || decimals.is_some() || active.is_some();
                if let Some(name) = name {
                    input.name = name;
                }
                if let Some(symbol) = symbol {
                    input.symbol = symbol;
                }
                if let Some(decimals) = decimals {
                    input.decimals = decimals;
                }
                if let Some(active) = active {
                    input.is_active = active;
                }
                Ok(changed)
            })?;
        }

        CurrencyCommands::Delete { currency } => {
            let found = service.find(&currency)?;
            run_delete(ctx, &found)?;
        }
    }

    Ok(())
}

fn find_rate(ctx: &CliContext, rate: &str, group: Option<&str>) -> LedgerResult<ExchangeRate> {
    let mut scope = ListQuery::default();
    if let Some(group_id) = ctx.optional_group_id(group)? {
        scope = scope.facet("economicGroupId", group_id);
    }
    EntityService::<ExchangeRate>::new(&ctx.client).find_in(rate, scope)
}

/// Handle an exchange rate command
pub fn handle_rate_command(ctx: &CliContext, cmd: RateCommands) -> LedgerResult<()> {
    match cmd {
        RateCommands::List {
            args,
            from,
            to,
            rate_type,
        } => {
            let mut query = args.query(&ctx.settings);
            if let Some(group_id) = ctx.optional_group_id(args.group.as_deref())? {
                query = query.facet("economicGroupId", group_id);
            }
            if let Some(from) = from {
                query = query.facet("fromCurrency", from.to_uppercase());
            }
            if let Some(to) = to {
                query = query.facet("toCurrency", to.to_uppercase());
            }
            if let Some(rate_type) = rate_type {
                query = query.facet("rateType", rate_type);
            }
            run_entity_list::<ExchangeRate>(ctx, &args, query)?;
        }

        RateCommands::Show {
            rate,
            group,
            format,
        } => {
            let found = find_rate(ctx, &rate, group.as_deref())?;
            print_entity(ctx, &found, format)?;
        }

        RateCommands::Create {
            from,
            to,
            rate,
            date,
            rate_type,
            group,
        } => {
            let input = ExchangeRateInput {
                economic_group_id: ctx.group_id(group.as_deref())?,
                from_currency: from,
                to_currency: to,
                rate,
                date,
                rate_type,
            };
            run_create::<ExchangeRate>(ctx, input)?;
        }

        RateCommands::Update {
            rate,
            group,
            value,
            date,
            rate_type,
        } => {
            let found = find_rate(ctx, &rate, group.as_deref())?;
            run_update(ctx, &found, |input| {
                let changed = value.is_some() || date.is_some() || rate_type.is_some();
                if let Some(value) = value {
                    input.rate = value;
                }
                if let Some(date) = date {
                    input.date = date;
                }
                if let Some(rate_type) = rate_type {
                    input.rate_type = rate_type;
                }
                Ok(changed)
            })?;
        }

        RateCommands::Delete { rate, group } => {
            let found = find_rate(ctx, &rate, group.as_deref())?;
            run_delete(ctx, &found)?;
        }
    }

    Ok(())
}
