//! Transaction CLI commands
//!
//! Implements CLI commands for transactions and settlements.

use std::collections::HashMap;

use chrono::{Local, NaiveDate, NaiveTime, Timelike};
use clap::Subcommand;

use crate::display::transaction::{format_transaction_details, format_transaction_register};
use crate::error::{SpendwiseError, SpendwiseResult};
use crate::models::{AccountId, Category, Mood, Transaction, TransactionDraft};
use crate::services::{AccountService, TransactionEdit, TransactionFilter, TransactionService};
use crate::storage::Storage;

/// Transaction subcommands
#[derive(Subcommand)]
pub enum TransactionCommands {
    /// Record a new expense
    Add {
        /// Account name or ID the money is paid from
        account: String,
        /// Amount (e.g. "50.00")
        amount: String,
        /// Category (food, transport, shopping, entertainment, bills, health, education, other)
        #[arg(short, long)]
        category: Option<String>,
        /// Transaction date (YYYY-MM-DD), defaults to today
        #[arg(short, long)]
        date: Option<String>,
        /// Time of day (HH:MM), defaults to now
        #[arg(short, long)]
        time: Option<String>,
        /// Description
        #[arg(short = 'D', long)]
        description: Option<String>,
        /// Mood (happy, stressed, tired, bored, excited, neutral)
        #[arg(short, long)]
        mood: Option<String>,
    },
    /// List transactions, newest first
    List {
        /// Filter by account name or ID
        #[arg(short, long)]
        account: Option<String>,
        /// Filter by category
        #[arg(short = 'C', long)]
        category: Option<String>,
        /// Number of transactions to show
        #[arg(short, long, default_value = "20")]
        limit: usize,
        /// Start date (YYYY-MM-DD)
        #[arg(long)]
        from: Option<String>,
        /// End date (YYYY-MM-DD)
        #[arg(long)]
        to: Option<String>,
        /// Only settlements
        #[arg(long, conflicts_with = "expenses")]
        settlements: bool,
        /// Only expenses
        #[arg(long)]
        expenses: bool,
        /// Search the description
        #[arg(short, long)]
        search: Option<String>,
    },
    /// Show transaction details
    Show {
        /// Transaction ID
        id: String,
    },
    /// Edit a transaction; balances are adjusted by the net difference
    Edit {
        /// Transaction ID
        id: String,
        /// New amount
        #[arg(short, long)]
        amount: Option<String>,
        /// New category
        #[arg(short, long)]
        category: Option<String>,
        /// New date
        #[arg(short, long)]
        date: Option<String>,
        /// New time
        #[arg(short, long)]
        time: Option<String>,
        /// New description
        #[arg(short = 'D', long)]
        description: Option<String>,
        /// New mood
        #[arg(short, long)]
        mood: Option<String>,
        /// Move to another source account
        #[arg(long)]
        account: Option<String>,
        /// Make this a settlement onto the given account
        #[arg(long, conflicts_with = "no_settlement")]
        settle_to: Option<String>,
        /// Turn a settlement back into an expense
        #[arg(long)]
        no_settlement: bool,
    },
    /// Delete a transaction and reverse its balance effect
    Delete {
        /// Transaction ID
        id: String,
    },
}

/// Parse a `YYYY-MM-DD` date
pub fn parse_date(input: &str) -> SpendwiseResult<NaiveDate> {
    NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d").map_err(|_| {
        SpendwiseError::Validation(format!("Invalid date format: '{}'. Use YYYY-MM-DD", input))
    })
}

/// Parse an `HH:MM` (or `HH:MM:SS`) time
pub fn parse_time(input: &str) -> SpendwiseResult<NaiveTime> {
    let input = input.trim();
    NaiveTime::parse_from_str(input, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(input, "%H:%M:%S"))
        .map_err(|_| {
            SpendwiseError::Validation(format!("Invalid time format: '{}'. Use HH:MM", input))
        })
}

pub fn parse_category(input: &str) -> SpendwiseResult<Category> {
    Category::parse(input).ok_or_else(|| {
        let valid = Category::ALL.iter().map(|c| c.label()).collect::<Vec<_>>();
        SpendwiseError::Validation(format!(
            "Unknown category: '{}'. Valid categories: {}",
            input,
            valid.join(", ")
        ))
    })
}

fn parse_mood(input: &str) -> SpendwiseResult<Mood> {
    Mood::parse(input).ok_or_else(|| {
        SpendwiseError::Validation(format!(
            "Unknown mood: '{}'. Valid moods: happy, stressed, tired, bored, excited, neutral",
            input
        ))
    })
}

/// Today's date and the current minute in local time
pub fn now_local() -> (NaiveDate, NaiveTime) {
    let now = Local::now().naive_local();
    let time = NaiveTime::from_hms_opt(now.hour(), now.minute(), 0).unwrap_or(now.time());
    (now.date(), time)
}

/// Account names by id, for display
pub fn account_names(storage: &Storage) -> SpendwiseResult<HashMap<AccountId, String>> {
    Ok(storage
        .accounts
        .get_all()?
        .into_iter()
        .map(|a| (a.id, a.name))
        .collect())
}

fn require_transaction(service: &TransactionService, id: &str) -> SpendwiseResult<Transaction> {
    service
        .find(id)?
        .ok_or_else(|| SpendwiseError::transaction_not_found(id))
}

fn print_transaction(heading: &str, txn: &Transaction, storage: &Storage) -> SpendwiseResult<()> {
    println!("{}", heading);
    print!("{}", format_transaction_details(txn, &account_names(storage)?));
    Ok(())
}

/// Handle a transaction command
pub fn handle_transaction_command(
    storage: &Storage,
    cmd: TransactionCommands,
) -> SpendwiseResult<()> {
    let service = TransactionService::new(storage);
    let account_service = AccountService::new(storage);

    match cmd {
        TransactionCommands::Add {
            account,
            amount,
            category,
            date,
            time,
            description,
            mood,
        } => {
            let account = account_service.require(&account)?;
            let amount = TransactionService::parse_amount(&amount)?;
            let (today, now) = now_local();

            let mut draft = TransactionDraft::expense(
                account.id,
                amount,
                date.as_deref().map(parse_date).transpose()?.unwrap_or(today),
                time.as_deref().map(parse_time).transpose()?.unwrap_or(now),
            );
            if let Some(category) = category {
                draft.category = parse_category(&category)?;
            }
            if let Some(mood) = mood {
                draft.mood = parse_mood(&mood)?;
            }
            if let Some(description) = description {
                draft.description = description.trim().to_string();
            }

            let txn = service.create(draft)?;
            print_transaction("Created transaction:", &txn, storage)?;
        }

        TransactionCommands::List {
            account,
            category,
            limit,
            from,
            to,
            settlements,
            expenses,
            search,
        } => {
            let mut filter = TransactionFilter::new().limit(limit);

            if let Some(account) = &account {
                filter = filter.account(account_service.require(account)?.id);
            }
            if let Some(category) = &category {
                filter = filter.category(parse_category(category)?);
            }
            filter.start_date = from.as_deref().map(parse_date).transpose()?;
            filter.end_date = to.as_deref().map(parse_date).transpose()?;
            if settlements {
                filter = filter.settlements(true);
            } else if expenses {
                filter = filter.settlements(false);
            }
            if let Some(search) = search {
                filter = filter.search(search);
            }

            let transactions = service.list(filter)?;
            print!(
                "{}",
                format_transaction_register(&transactions, &account_names(storage)?)
            );
        }

        TransactionCommands::Show { id } => {
            let txn = require_transaction(&service, &id)?;
            print!("{}", format_transaction_details(&txn, &account_names(storage)?));
        }

        TransactionCommands::Edit {
            id,
            amount,
            category,
            date,
            time,
            description,
            mood,
            account,
            settle_to,
            no_settlement,
        } => {
            let txn = require_transaction(&service, &id)?;

            let edit = TransactionEdit {
                amount: amount
                    .as_deref()
                    .map(TransactionService::parse_amount)
                    .transpose()?,
                category: category.as_deref().map(parse_category).transpose()?,
                date: date.as_deref().map(parse_date).transpose()?,
                time: time.as_deref().map(parse_time).transpose()?,
                description,
                mood: mood.as_deref().map(parse_mood).transpose()?,
                account_id: account
                    .as_deref()
                    .map(|a| account_service.require(a).map(|a| a.id))
                    .transpose()?,
                settle_to: settle_to
                    .as_deref()
                    .map(|a| account_service.require(a).map(|a| a.id))
                    .transpose()?,
                clear_settlement: no_settlement,
            };

            if edit.is_empty() {
                println!("No changes specified.");
                return Ok(());
            }

            let updated = service.update(txn.id, edit)?;
            print_transaction("Updated transaction:", &updated, storage)?;
        }

        TransactionCommands::Delete { id } => {
            let txn = require_transaction(&service, &id)?;
            let deleted = service.delete(txn.id)?;
            println!("Deleted transaction: {} ({})", deleted.id, deleted);
        }
    }

    Ok(())
}

/// Handle `settle <from> <to> <amount>`
pub fn handle_settle_command(
    storage: &Storage,
    from: &str,
    to: &str,
    amount: &str,
    date: Option<&str>,
    description: Option<String>,
) -> SpendwiseResult<()> {
    let account_service = AccountService::new(storage);
    let source = account_service.require(from)?;
    let target = account_service.require(to)?;
    let amount = TransactionService::parse_amount(amount)?;
    let (today, now) = now_local();
    let date = date.map(parse_date).transpose()?.unwrap_or(today);

    let txn = TransactionService::new(storage).settle(
        source.id,
        target.id,
        amount,
        date,
        now,
        description,
    )?;

    println!("Paid {} from {} to {}", txn.amount, source.name, target.name);
    let names = account_names(storage)?;
    for id in [source.id, target.id] {
        if let Some(account) = storage.accounts.get(id)? {
            println!(
                "  {:<20} {}",
                names.get(&id).map(String::as_str).unwrap_or(""),
                account.balance
            );
        }
    }
    Ok(())
}
