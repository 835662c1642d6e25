//! Reports module for Spendwise
//!
//! Chart data and headline figures: spending by category, the daily trend
//! and the dashboard summary.

pub mod daily;
pub mod dashboard;
pub mod spending;

pub use daily::{DailyTotal, DailyTrendReport, DEFAULT_DAYS};
pub use dashboard::DashboardSummary;
pub use spending::{SpendingByCategory, SpendingReport};
