//! Account CLI commands
//!
//! Implements CLI commands for account management and balance verification.

use clap::Subcommand;

use crate::display::account::{format_account_details, format_account_list};
use crate::error::{SpendwiseError, SpendwiseResult};
use crate::models::{AccountType, Money};
use crate::services::{AccountEdit, AccountService, LedgerEngine};
use crate::storage::Storage;

/// Account subcommands
#[derive(Subcommand)]
pub enum AccountCommands {
    /// Create a new account
    Create {
        /// Account name
        name: String,
        /// Account type (checking, savings, credit, investment, cash)
        #[arg(short = 't', long, default_value = "checking")]
        account_type: String,
        /// Opening balance; negative for money owed on a card (e.g. "-200")
        #[arg(short, long, default_value = "0", allow_hyphen_values = true)]
        balance: String,
        /// Credit limit (credit cards only)
        #[arg(short, long)]
        limit: Option<String>,
    },
    /// List all accounts
    List,
    /// Show account details
    Show {
        /// Account name or ID
        account: String,
    },
    /// Rename an account or change its credit limit
    Edit {
        /// Account name or ID
        account: String,
        /// New name
        #[arg(short, long)]
        name: Option<String>,
        /// New credit limit
        #[arg(short, long, conflicts_with = "clear_limit")]
        limit: Option<String>,
        /// Remove the credit limit
        #[arg(long)]
        clear_limit: bool,
    },
    /// Delete an account that has no transactions
    Delete {
        /// Account name or ID
        account: String,
    },
    /// Recompute balances from transactions and report differences
    Verify,
}

fn parse_money(input: &str, what: &str) -> SpendwiseResult<Money> {
    Money::parse(input).map_err(|e| {
        SpendwiseError::Validation(format!(
            "Invalid {} format: '{}'. Use format like '1000.00' or '1000'. Error: {}",
            what, input, e
        ))
    })
}

/// Handle an account command
pub fn handle_account_command(
    storage: &Storage,
    cmd: AccountCommands,
) -> SpendwiseResult<()> {
    let service = AccountService::new(storage);
    let currency = storage.profile.settings()?.currency();

    match cmd {
        AccountCommands::Create {
            name,
            account_type,
            balance,
            limit,
        } => {
            let account_type = AccountType::parse(&account_type).ok_or_else(|| {
                SpendwiseError::Validation(format!(
                    "Invalid account type: '{}'. Valid types: checking, savings, credit, investment, cash",
                    account_type
                ))
            })?;
            let opening_balance = parse_money(&balance, "balance")?;
            let credit_limit = limit
                .as_deref()
                .map(|l| parse_money(l, "limit"))
                .transpose()?;

            let account = service.create(&name, account_type, opening_balance, credit_limit)?;

            println!("Created account: {}", account.name);
            println!("  Type: {}", account.account_type);
            println!("  Opening Balance: {}", account.opening_balance);
            if let Some(limit) = account.credit_limit {
                println!("  Credit Limit: {}", limit);
            }
            println!("  ID: {}", account.id);
        }

        AccountCommands::List => {
            let summaries = service.list_summaries()?;
            print!("{}", format_account_list(&summaries, currency));
        }

        AccountCommands::Show { account } => {
            let found = service.require(&account)?;
            let summary = service.summary(found)?;
            print!("{}", format_account_details(&summary, currency));
        }

        AccountCommands::Edit {
            account,
            name,
            limit,
            clear_limit,
        } => {
            let found = service.require(&account)?;

            let credit_limit = match (limit, clear_limit) {
                (Some(limit), _) => Some(Some(parse_money(&limit, "limit")?)),
                (None, true) => Some(None),
                (None, false) => None,
            };

            if name.is_none() && credit_limit.is_none() {
                println!("No changes specified. Use --name, --limit or --clear-limit.");
                return Ok(());
            }

            let updated = service.update(found.id, AccountEdit { name, credit_limit })?;
            println!("Updated account: {}", updated.name);
        }

        AccountCommands::Delete { account } => {
            let found = service.require(&account)?;
            let deleted = service.delete(found.id)?;
            println!("Deleted account: {}", deleted.name);
        }

        AccountCommands::Verify => {
            let mismatches = LedgerEngine::new(storage).verify()?;
            if mismatches.is_empty() {
                println!("All account balances match their transactions.");
            } else {
                for m in &mismatches {
                    println!(
                        "{}: stored {} but transactions give {} (off by {})",
                        m.account_name,
                        m.actual,
                        m.expected,
                        m.difference()
                            .map(|d| d.to_string())
                            .unwrap_or_else(|| "out of range".to_string())
                    );
                }
                return Err(SpendwiseError::Validation(format!(
                    "{} account balance(s) out of balance",
                    mismatches.len()
                )));
            }
        }
    }

    Ok(())
}
