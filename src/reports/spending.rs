//! Spending Report
//!
//! Spending per category, the data behind the category chart. Settlements
//! move money between accounts and are not spending, so they are left out.

use crate::error::{SpendwiseError, SpendwiseResult};
use crate::models::{Category, Money, Transaction};
use crate::storage::Storage;
use chrono::NaiveDate;
use std::collections::HashMap;

/// Spending in one category
#[derive(Debug, Clone)]
pub struct SpendingByCategory {
    pub category: Category,
    /// Total spent
    pub total: Money,
    /// Number of transactions
    pub transaction_count: usize,
    /// Percentage of total spending
    pub percentage: f64,
}

/// Spending Report
#[derive(Debug, Clone)]
pub struct SpendingReport {
    /// Date range, when the report is restricted to one
    pub range: Option<(NaiveDate, NaiveDate)>,
    /// Categories with spending, largest first
    pub categories: Vec<SpendingByCategory>,
    /// Total spending across all categories
    pub total_spending: Money,
    /// Number of spending transactions
    pub total_transactions: usize,
}

impl SpendingReport {
    /// Generate a report over all transactions, or those in a date range
    pub fn generate(
        storage: &Storage,
        range: Option<(NaiveDate, NaiveDate)>,
    ) -> SpendwiseResult<Self> {
        let transactions = match range {
            Some((start, end)) => storage.transactions.get_by_date_range(start, end)?,
            None => storage.transactions.get_all()?,
        };
        Self::from_transactions(&transactions, range)
    }

    /// Build the report from an already loaded transaction list
    ///
    /// Fails with `InvalidAmount` if a total leaves the representable range.
    pub fn from_transactions(
        transactions: &[Transaction],
        range: Option<(NaiveDate, NaiveDate)>,
    ) -> SpendwiseResult<Self> {
        let out_of_range = || SpendwiseError::InvalidAmount("spending total out of range".into());
        let mut by_category: HashMap<Category, (Money, usize)> = HashMap::new();
        let mut total_spending = Money::zero();
        let mut total_transactions = 0;

        for txn in transactions.iter().filter(|t| t.is_spending()) {
            let entry = by_category
                .entry(txn.category)
                .or_insert((Money::zero(), 0));
            entry.0 = entry.0.checked_add(txn.amount).ok_or_else(out_of_range)?;
            entry.1 += 1;
            total_spending = total_spending
                .checked_add(txn.amount)
                .ok_or_else(out_of_range)?;
            total_transactions += 1;
        }

        let mut categories: Vec<_> = by_category
            .into_iter()
            .map(|(category, (total, transaction_count))| SpendingByCategory {
                category,
                total,
                transaction_count,
                percentage: if total_spending.is_zero() {
                    0.0
                } else {
                    (total.cents() as f64 / total_spending.cents() as f64) * 100.0
                },
            })
            .collect();

        // Largest first; ties in category order so output is stable
        categories.sort_by(|a, b| b.total.cmp(&a.total).then(a.category.cmp(&b.category)));

        Ok(Self {
            range,
            categories,
            total_spending,
            total_transactions,
        })
    }

    /// Format the report for terminal display
    pub fn format_terminal(&self) -> String {
        let mut output = String::new();

        match self.range {
            Some((start, end)) => {
                output.push_str(&format!("Spending by Category: {} to {}\n", start, end))
            }
            None => output.push_str("Spending by Category\n"),
        }
        output.push_str(&"=".repeat(60));
        output.push('\n');

        output.push_str(&format!(
            "{:<25} {:>14} {:>8} {:>8}\n",
            "Category", "Amount", "Count", "%"
        ));
        output.push_str(&"-".repeat(60));
        output.push('\n');

        for row in &self.categories {
            output.push_str(&format!(
                "{:<25} {:>14} {:>8} {:>7.1}%\n",
                row.category.label(),
                row.total,
                row.transaction_count,
                row.percentage
            ));
        }

        output.push_str(&"-".repeat(60));
        output.push('\n');
        output.push_str(&format!(
            "{:<25} {:>14} {:>8}\n",
            "TOTAL SPENDING", self.total_spending, self.total_transactions
        ));

        output
    }
}
