//! Spendwise - personal finance tracking with balance reconciliation
//!
//! This library provides the core functionality for the Spendwise
//! application: accounts, transactions, credit-card settlements and category
//! budgets, with every account balance kept equal to its opening balance plus
//! the effect of the transactions that reference it.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Configuration and path management
//! - `error`: Custom error types
//! - `models`: Core data models (accounts, transactions, budget goals, etc.)
//! - `storage`: Per-user JSON document store with a change feed
//! - `services`: Business logic, including the ledger engine
//! - `audit`: Audit logging system
//! - `reports`: Chart data and dashboard figures
//! - `gemini`: Client for the generative insight and receipt API
//!
//! # Example
//!
//! ```rust,ignore
//! use spendwise::config::{Settings, SpendwisePaths};
//! use spendwise::models::UserId;
//! use spendwise::storage::Storage;
//!
//! let paths = SpendwisePaths::new()?;
//! let settings = Settings::load_or_create(&paths)?;
//! let storage = Storage::open(&paths, UserId::new(settings.default_user)?)?;
//! storage.load_all()?;
//! ```

pub mod audit;
pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod gemini;
pub mod models;
pub mod reports;
pub mod services;
pub mod storage;

pub use error::{SpendwiseError, SpendwiseResult};
