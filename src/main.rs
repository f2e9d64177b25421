use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};

use ledgerdesk::api::{ApiClient, HttpTransport};
use ledgerdesk::cli::{
    handle_account_command, handle_audit_command, handle_chart_command, handle_company_command,
    handle_currency_command, handle_group_command, handle_party_command, handle_period_command,
    handle_permission_command, handle_rate_command, AccountCommands, AuditArgs, ChartCommands,
    CliContext, CompanyCommands, CurrencyCommands, GroupCommands, PartyCommands, PeriodCommands,
    PermissionCommands, RateCommands,
};
use ledgerdesk::config::{BackendKind, LedgerPaths, Locale, Settings};
use ledgerdesk::models::{Customer, Supplier};
use ledgerdesk::server::LocalServer;
use ledgerdesk::storage::initialize_storage;

#[derive(Parser)]
#[command(
    name = "ledgerdesk",
    author = "Kaylee Beyene",
    version,
    about = "Administration of accounting master data",
    long_about = "ledgerdesk manages the master data of a double-entry accounting system: \
                  economic groups, companies, customers, suppliers, currencies, exchange \
                  rates, accounting periods, charts of accounts and user permissions. It \
                  talks to a remote REST API or to a local backend stored as JSON files."
)]
struct Cli {
    /// Backend to use for this invocation (local or remote)
    #[arg(long, global = true, value_parser = parse_backend)]
    backend: Option<BackendKind>,

    /// Remote API base URL
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// User id sent as x-user-id
    #[arg(long, global = true)]
    user_id: Option<String>,

    /// More logging (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    /// Answer yes to confirmation prompts
    #[arg(long, global = true)]
    yes: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

fn parse_backend(s: &str) -> std::result::Result<BackendKind, String> {
    BackendKind::parse(s).ok_or_else(|| format!("Invalid backend: '{}'. Use local or remote", s))
}

fn parse_locale(s: &str) -> std::result::Result<Locale, String> {
    Locale::parse(s).ok_or_else(|| format!("Unsupported locale: '{}'. Use en or es", s))
}

#[derive(Subcommand)]
enum Commands {
    /// Economic groups
    #[command(subcommand)]
    Group(GroupCommands),

    /// Companies
    #[command(subcommand)]
    Company(CompanyCommands),

    /// Customers
    #[command(subcommand)]
    Customer(PartyCommands),

    /// Suppliers
    #[command(subcommand)]
    Supplier(PartyCommands),

    /// Currencies
    #[command(subcommand)]
    Currency(CurrencyCommands),

    /// Exchange rates
    #[command(subcommand)]
    Rate(RateCommands),

    /// Accounting periods
    #[command(subcommand)]
    Period(PeriodCommands),

    /// Charts of accounts
    #[command(subcommand)]
    Chart(ChartCommands),

    /// Ledger accounts
    #[command(subcommand)]
    Account(AccountCommands),

    /// User/company permissions
    #[command(subcommand)]
    Permission(PermissionCommands),

    /// Show recent audit log entries (local backend)
    Audit(AuditArgs),

    /// Initialize the data directory and seed currencies
    Init,

    /// Show or change settings
    Config {
        #[arg(long, value_parser = parse_locale)]
        locale: Option<Locale>,
        #[arg(long = "set-backend", value_parser = parse_backend)]
        set_backend: Option<BackendKind>,
        #[arg(long = "set-api-url")]
        set_api_url: Option<String>,
        #[arg(long = "set-user-id")]
        set_user_id: Option<String>,
        /// Default economic group (code or ID)
        #[arg(long)]
        group: Option<String>,
        #[arg(long)]
        page_size: Option<u32>,
    },
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .init();
}

fn build_client(paths: &LedgerPaths, settings: &Settings) -> Result<ApiClient> {
    let user_id = settings.effective_user_id();
    let client = match settings.backend {
        BackendKind::Local => ApiClient::new(
            LocalServer::open(paths, user_id).context("Failed to open local backend")?,
        ),
        BackendKind::Remote => {
            let url = settings.resolved_api_url();
            log::info!("Using remote API at {}", url);
            ApiClient::new(HttpTransport::new(url, user_id, settings.request_timeout())?)
        }
    };
    Ok(client)
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let paths = LedgerPaths::new()?;
    let mut settings = Settings::load_or_create(&paths)?;

    // Per-invocation overrides; never persisted
    if let Some(backend) = cli.backend {
        settings.backend = backend;
    }
    if let Some(url) = cli.api_url.clone() {
        settings.api_url = Some(url);
    }
    if let Some(user) = cli.user_id.clone() {
        settings.user_id = Some(user);
    }

    let Some(command) = cli.command else {
        println!("ledgerdesk - accounting master data administration");
        println!();
        println!("Run 'ledgerdesk --help' for usage information.");
        println!("Run 'ledgerdesk init' to set up the local backend.");
        return Ok(());
    };

    let client = build_client(&paths, &settings)?;
    let ctx = CliContext {
        client,
        settings,
        paths,
        assume_yes: cli.yes,
    };

    match command {
        Commands::Group(cmd) => handle_group_command(&ctx, cmd)?,
        Commands::Company(cmd) => handle_company_command(&ctx, cmd)?,
        Commands::Customer(cmd) => handle_party_command::<Customer>(&ctx, cmd)?,
        Commands::Supplier(cmd) => handle_party_command::<Supplier>(&ctx, cmd)?,
        Commands::Currency(cmd) => handle_currency_command(&ctx, cmd)?,
        Commands::Rate(cmd) => handle_rate_command(&ctx, cmd)?,
        Commands::Period(cmd) => handle_period_command(&ctx, cmd)?,
        Commands::Chart(cmd) => handle_chart_command(&ctx, cmd)?,
        Commands::Account(cmd) => handle_account_command(&ctx, cmd)?,
        Commands::Permission(cmd) => handle_permission_command(&ctx, cmd)?,
        Commands::Audit(args) => handle_audit_command(&ctx, args)?,

        Commands::Init => {
            println!("Initializing ledgerdesk at: {}", ctx.paths.base_dir().display());
            let seeded = initialize_storage(&ctx.paths)?;
            // Reload so command-line overrides do not end up on disk
            Settings::load_or_create(&ctx.paths)?.save(&ctx.paths)?;
            println!("Initialization complete!");
            if seeded > 0 {
                println!();
                println!("Seeded {} currencies: USD, EUR, GBP, MXN, COP", seeded);
            }
            println!();
            println!("Run 'ledgerdesk group create CODE NAME' to add your first economic group.");
        }

        Commands::Config {
            locale,
            set_backend,
            set_api_url,
            set_user_id,
            group,
            page_size,
        } => {
            let mut stored = Settings::load_or_create(&ctx.paths)?;
            let mut changed = false;
            if let Some(locale) = locale {
                stored.locale = locale;
                changed = true;
            }
            if let Some(backend) = set_backend {
                stored.backend = backend;
                changed = true;
            }
            if let Some(url) = set_api_url {
                stored.api_url = Some(url).filter(|u| !u.trim().is_empty());
                changed = true;
            }
            if let Some(user) = set_user_id {
                stored.user_id = Some(user).filter(|u| !u.trim().is_empty());
                changed = true;
            }
            if let Some(group) = group {
                stored.economic_group = Some(ctx.group_id(Some(&group))?);
                changed = true;
            }
            if let Some(page_size) = page_size {
                stored.page_size = page_size.clamp(1, 100);
                changed = true;
            }
            if changed {
                stored.save(&ctx.paths)?;
                println!("Settings saved.");
                println!();
            }

            println!("ledgerdesk Configuration");
            println!("========================");
            println!("Base directory:   {}", ctx.paths.base_dir().display());
            println!("Data directory:   {}", ctx.paths.data_dir().display());
            println!();
            println!("Settings:");
            println!("  Backend:        {:?}", stored.backend);
            println!("  API URL:        {}", stored.resolved_api_url());
            println!(
                "  User ID:        {}",
                stored.effective_user_id().unwrap_or_else(|| "-".into())
            );
            println!("  Locale:         {}", stored.locale);
            println!("  Page size:      {}", stored.page_size);
            println!(
                "  Default group:  {}",
                stored
                    .economic_group
                    .map(|g| g.to_string())
                    .unwrap_or_else(|| "-".into())
            );
        }
    }

    Ok(())
}
