//! Service layer for Spendwise
//!
//! The service layer provides business logic on top of the storage layer,
//! handling validation, balance reconciliation, and the external AI
//! collaborators.

pub mod account;
pub mod budget;
pub mod insights;
pub mod ledger;
pub mod profile;
pub mod receipt;
pub mod transaction;

pub use account::{AccountEdit, AccountService, AccountSummary};
pub use budget::{BudgetProgress, BudgetService, BudgetStatus};
pub use insights::{InsightOutcome, InsightProvider, InsightService};
pub use ledger::{BalanceMismatch, LedgerEngine};
pub use profile::ProfileService;
pub use receipt::{ReceiptDraft, ReceiptImage, ReceiptScanner, ReceiptService};
pub use transaction::{TransactionEdit, TransactionFilter, TransactionService};
