//! Daily Trend Report
//!
//! Spending per day over a trailing window, oldest day first, with every day
//! present even when nothing was spent.

use crate::error::{SpendwiseError, SpendwiseResult};
use crate::models::{Money, Transaction};
use crate::storage::Storage;
use chrono::{Days, NaiveDate};

/// Default window length
pub const DEFAULT_DAYS: u32 = 7;

/// Spending on one day
#[derive(Debug, Clone, PartialEq)]
pub struct DailyTotal {
    pub date: NaiveDate,
    pub total: Money,
}

impl DailyTotal {
    /// Short weekday label, e.g. `Mon`
    pub fn weekday(&self) -> String {
        self.date.format("%a").to_string()
    }
}

/// Daily Trend Report
#[derive(Debug, Clone)]
pub struct DailyTrendReport {
    pub days: Vec<DailyTotal>,
}

impl DailyTrendReport {
    /// Generate the trend for the `days` days ending on `end` (inclusive)
    pub fn generate(storage: &Storage, end: NaiveDate, days: u32) -> SpendwiseResult<Self> {
        let days = days.max(1);
        let start = end
            .checked_sub_days(Days::new(u64::from(days - 1)))
            .unwrap_or(NaiveDate::MIN);
        let transactions = storage.transactions.get_by_date_range(start, end)?;
        Self::from_transactions(&transactions, end, days)
    }

    /// Build the trend from an already loaded transaction list
    pub fn from_transactions(
        transactions: &[Transaction],
        end: NaiveDate,
        days: u32,
    ) -> SpendwiseResult<Self> {
        let days = (0..days.max(1))
            .rev()
            .filter_map(|offset| end.checked_sub_days(Days::new(u64::from(offset))))
            .map(|date| {
                let total = Money::checked_sum(
                    transactions
                        .iter()
                        .filter(|t| t.is_spending() && t.date == date)
                        .map(|t| t.amount),
                )
                .ok_or_else(|| {
                    SpendwiseError::InvalidAmount(format!("spending on {} out of range", date))
                })?;
                Ok(DailyTotal { date, total })
            })
            .collect::<SpendwiseResult<Vec<_>>>()?;

        Ok(Self { days })
    }

    /// Largest single-day total
    pub fn peak(&self) -> Money {
        self.days
            .iter()
            .map(|d| d.total)
            .max()
            .unwrap_or_default()
    }

    /// Format the report as a text bar chart
    pub fn format_terminal(&self) -> String {
        const WIDTH: i128 = 40;

        let mut output = String::new();
        output.push_str(&format!("Daily Trend (Last {} Days)\n", self.days.len()));
        output.push_str(&"=".repeat(60));
        output.push('\n');

        let peak = i128::from(self.peak().cents());
        for day in &self.days {
            let bar = if peak > 0 {
                (i128::from(day.total.cents()) * WIDTH / peak) as usize
            } else {
                0
            };
            output.push_str(&format!(
                "{} {} {:>12} {}\n",
                day.weekday(),
                day.date,
                day.total,
                "#".repeat(bar)
            ));
        }

        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AccountId, TransactionDraft};
    use chrono::NaiveTime;

    fn spend(date: NaiveDate, units: i64) -> Transaction {
        Transaction::from_draft(TransactionDraft::expense(
            AccountId::new(),
            Money::from_units(units),
            date,
            NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
        ))
    }

    #[test]
    fn test_window_is_zero_filled_oldest_first() {
        let end = NaiveDate::from_ymd_opt(2025, 3, 10).unwrap();
        let transactions = vec![
            spend(end, 10),
            spend(end, 5),
            spend(NaiveDate::from_ymd_opt(2025, 3, 4).unwrap(), 7),
            // Outside the window
            spend(NaiveDate::from_ymd_opt(2025, 3, 3).unwrap(), 100),
        ];

        let report = DailyTrendReport::from_transactions(&transactions, end, DEFAULT_DAYS).unwrap();
        assert_eq!(report.days.len(), 7);
        assert_eq!(report.days[0].date, NaiveDate::from_ymd_opt(2025, 3, 4).unwrap());
        assert_eq!(report.days[0].total, Money::from_units(7));
        assert_eq!(report.days[3].total, Money::zero());
        assert_eq!(report.days[6].date, end);
        assert_eq!(report.days[6].total, Money::from_units(15));
        assert_eq!(report.peak(), Money::from_units(15));
    }

    #[test]
    fn test_weekday_label() {
        let day = DailyTotal {
            date: NaiveDate::from_ymd_opt(2025, 3, 10).unwrap(),
            total: Money::zero(),
        };
        assert_eq!(day.weekday(), "Mon");
    }

    #[test]
    fn test_zero_days_means_one() {
        let end = NaiveDate::from_ymd_opt(2025, 3, 10).unwrap();
        let report = DailyTrendReport::from_transactions(&[], end, 0).unwrap();
        assert_eq!(report.days.len(), 1);
        assert!(report.format_terminal().contains("2025-03-10"));
    }
}
