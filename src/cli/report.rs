//! CLI command for reports
//!
//! Prints the dashboard, spending by category and the daily trend.

use chrono::NaiveDate;

use super::transaction::{now_local, parse_date};
use crate::display::report::format_dashboard;
use crate::error::SpendwiseResult;
use crate::reports::{DailyTrendReport, DashboardSummary, SpendingReport};
use crate::storage::Storage;

/// Options for the report command
#[derive(Debug, Clone, Default)]
pub struct ReportOptions {
    /// Length of the daily trend window
    pub days: u32,
    /// Last day of the daily trend (defaults to today)
    pub end: Option<String>,
    /// Restrict spending by category to this range
    pub from: Option<String>,
    pub to: Option<String>,
}

/// Handle the report command
pub fn handle_report_command(storage: &Storage, options: ReportOptions) -> SpendwiseResult<()> {
    let currency = storage.profile.settings()?.currency();

    let dashboard = DashboardSummary::generate(storage)?;
    println!("{}", format_dashboard(&dashboard, currency));

    let from = options.from.as_deref().map(parse_date).transpose()?;
    let to = options.to.as_deref().map(parse_date).transpose()?;
    let range = match (from, to) {
        (None, None) => None,
        (from, to) => Some((from.unwrap_or(NaiveDate::MIN), to.unwrap_or(NaiveDate::MAX))),
    };
    let spending = SpendingReport::generate(storage, range)?;
    println!("{}", spending.format_terminal());

    let end = match options.end.as_deref() {
        Some(end) => parse_date(end)?,
        None => now_local().0,
    };
    let trend = DailyTrendReport::generate(storage, end, options.days)?;
    print!("{}", trend.format_terminal());

    Ok(())
}
