//! Display formatting for terminal output
//!
//! Provides utilities for formatting data models for terminal display,
//! including tables and status indicators.

pub mod account;
pub mod budget;
pub mod report;
pub mod transaction;

pub use account::{format_account_details, format_account_list};
pub use budget::format_budget_progress;
pub use report::{format_dashboard, format_insights};
pub use transaction::{format_transaction_details, format_transaction_register};
