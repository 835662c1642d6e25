//! Core data models for Spendwise
//!
//! This module contains all the data structures that represent the finance
//! tracking domain: accounts, transactions, budget goals, insights, etc.

pub mod account;
pub mod budget;
pub mod category;
pub mod ids;
pub mod insight;
pub mod money;
pub mod profile;
pub mod transaction;

pub use account::{Account, AccountType};
pub use budget::BudgetGoal;
pub use category::{Category, Mood};
pub use ids::{AccountId, BudgetGoalId, TransactionId, UserId};
pub use insight::{BehavioralInsight, InsightKind, Severity};
pub use money::Money;
pub use profile::{
    Currency, Language, ProfileUpdate, SettingsUpdate, UserProfile, UserSettings, CURRENCIES,
};
pub use transaction::{Transaction, TransactionDraft};
