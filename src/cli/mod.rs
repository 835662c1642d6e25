//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the service layer.

pub mod account;
pub mod budget;
pub mod insights;
pub mod profile;
pub mod report;
pub mod transaction;

pub use account::{handle_account_command, AccountCommands};
pub use budget::{handle_budget_command, BudgetCommands};
pub use insights::{handle_insights_command, handle_receipt_command};
pub use profile::{
    handle_profile_command, handle_settings_command, ProfileCommands, SettingsCommands,
};
pub use report::{handle_report_command, ReportOptions};
pub use transaction::{handle_settle_command, handle_transaction_command, TransactionCommands};
