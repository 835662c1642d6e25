use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

use spendwise::cli::{
    handle_account_command, handle_budget_command, handle_insights_command,
    handle_profile_command, handle_receipt_command, handle_report_command,
    handle_settings_command, handle_settle_command, handle_transaction_command, AccountCommands,
    BudgetCommands, ProfileCommands, ReportOptions, SettingsCommands, TransactionCommands,
};
use spendwise::config::{Settings, SpendwisePaths};
use spendwise::models::UserId;
use spendwise::reports::DEFAULT_DAYS;
use spendwise::services::{BudgetService, ProfileService};
use spendwise::storage::Storage;

#[derive(Parser)]
#[command(
    name = "spendwise",
    version,
    about = "Personal finance tracker with balance reconciliation",
    long_about = "Spendwise tracks spending across accounts, keeps every balance in step \
                  with its transactions (including credit-card settlements), follows \
                  category budgets and offers AI-generated behavioral insights."
)]
struct Cli {
    /// User whose data to use
    #[arg(short, long, global = true, env = "SPENDWISE_USER")]
    user: Option<String>,

    /// Log level when RUST_LOG is not set (error, warn, info, debug, trace)
    #[arg(long, global = true, default_value = "warn")]
    log_level: LevelFilter,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Set up the data directory, profile and default budget goals
    Init {
        /// E-mail address for the profile
        #[arg(short, long)]
        email: Option<String>,
        /// Do not create the default budget goals
        #[arg(long)]
        no_goals: bool,
    },

    /// Show current configuration and paths
    Config,

    /// Account management commands
    #[command(subcommand)]
    Account(AccountCommands),

    /// Transaction management commands
    #[command(subcommand, alias = "txn")]
    Transaction(TransactionCommands),

    /// Pay down a credit card (or any account) from another account
    Settle {
        /// Account paid from
        from: String,
        /// Account paid to
        to: String,
        /// Amount
        amount: String,
        /// Date (YYYY-MM-DD), defaults to today
        #[arg(short, long)]
        date: Option<String>,
        /// Description
        #[arg(short = 'D', long)]
        description: Option<String>,
    },

    /// Budget goal commands
    #[command(subcommand)]
    Budget(BudgetCommands),

    /// Dashboard, spending by category and daily trend
    Report {
        /// Days in the daily trend
        #[arg(long, default_value_t = DEFAULT_DAYS)]
        days: u32,
        /// Last day of the daily trend (YYYY-MM-DD)
        #[arg(long)]
        end: Option<String>,
        /// Start of the spending-by-category range
        #[arg(long)]
        from: Option<String>,
        /// End of the spending-by-category range
        #[arg(long)]
        to: Option<String>,
    },

    /// Ask the AI for behavioral insights about your spending
    Insights,

    /// Read a receipt photo into a transaction
    Receipt {
        /// Image file (jpg, png, webp, heic)
        image: PathBuf,
        /// Account to record the transaction on (defaults to the first)
        #[arg(short, long)]
        account: Option<String>,
        /// Save the scanned transaction
        #[arg(long)]
        save: bool,
    },

    /// Profile commands
    #[command(subcommand)]
    Profile(ProfileCommands),

    /// Language and currency preferences
    #[command(subcommand)]
    Settings(SettingsCommands),

    /// Show recent changes from the audit log
    Audit {
        /// Number of entries to show
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },
}

fn init_logger(level: LevelFilter) {
    let filter = match std::env::var("RUST_LOG").ok() {
        Some(_) => EnvFilter::from_default_env(),
        None => EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), level)),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logger(cli.log_level);

    // Initialize paths and settings
    let paths = SpendwisePaths::new()?;
    let settings = Settings::load_or_create(&paths)?;
    let user = UserId::new(cli.user.unwrap_or_else(|| settings.default_user.clone()))?;
    debug!(user = %user, base_dir = %paths.base_dir().display(), "Starting");

    // Initialize storage
    let storage = Storage::open(&paths, user)?;
    storage.load_all()?;

    match cli.command {
        Some(Commands::Init { email, no_goals }) => {
            println!("Initializing Spendwise at: {}", paths.base_dir().display());
            if !paths.settings_file().exists() {
                settings.save(&paths)?;
            }

            let profile =
                ProfileService::new(&storage).ensure_profile(email.as_deref().unwrap_or(""))?;
            println!("Profile: {} ({})", profile.name, storage.user());

            if !no_goals {
                let seeded = BudgetService::new(&storage).seed_defaults()?;
                if seeded > 0 {
                    println!("Created {} default budget goals.", seeded);
                }
            }
            println!("Initialization complete!");
            println!();
            println!("Run 'spendwise account create <name>' to add your first account.");
        }
        Some(Commands::Config) => {
            let preferences = storage.profile.settings()?;
            println!("Spendwise Configuration");
            println!("=======================");
            println!("Data directory:  {}", paths.base_dir().display());
            println!("User directory:  {}", storage.paths().dir().display());
            println!("User:            {}", storage.user());
            println!();
            println!("Settings:");
            println!("  Default user:  {}", settings.default_user);
            println!("  Date format:   {}", settings.date_format);
            println!("  AI model:      {}", settings.insights.model);
            println!(
                "  API key:       {} ({})",
                if settings.insights.api_key().is_some() { "set" } else { "not set" },
                settings.insights.api_key_env
            );
            println!("  Language:      {}", preferences.language);
            println!("  Currency:      {}", preferences.currency().code);
        }
        Some(Commands::Account(cmd)) => {
            handle_account_command(&storage, cmd)?;
        }
        Some(Commands::Transaction(cmd)) => {
            handle_transaction_command(&storage, cmd)?;
        }
        Some(Commands::Settle {
            from,
            to,
            amount,
            date,
            description,
        }) => {
            handle_settle_command(&storage, &from, &to, &amount, date.as_deref(), description)?;
        }
        Some(Commands::Budget(cmd)) => {
            handle_budget_command(&storage, cmd)?;
        }
        Some(Commands::Report {
            days,
            end,
            from,
            to,
        }) => {
            handle_report_command(
                &storage,
                ReportOptions {
                    days,
                    end,
                    from,
                    to,
                },
            )?;
        }
        Some(Commands::Insights) => {
            handle_insights_command(&storage, &settings)?;
        }
        Some(Commands::Receipt {
            image,
            account,
            save,
        }) => {
            handle_receipt_command(&storage, &settings, &image, account.as_deref(), save)?;
        }
        Some(Commands::Profile(cmd)) => {
            handle_profile_command(&storage, cmd)?;
        }
        Some(Commands::Settings(cmd)) => {
            handle_settings_command(&storage, cmd)?;
        }
        Some(Commands::Audit { limit }) => {
            let entries = storage.audit().read_recent(limit)?;
            if entries.is_empty() {
                println!("No changes recorded yet.");
            }
            for entry in entries {
                println!("{}", entry.format_human_readable());
            }
        }
        None => {
            println!("Spendwise - personal finance tracker");
            println!();
            println!("Run 'spendwise --help' for usage information.");
            println!("Run 'spendwise init' to get started.");
        }
    }

    Ok(())
}
