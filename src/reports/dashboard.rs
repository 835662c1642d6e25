//! Dashboard summary: the headline numbers shown above the charts

use crate::error::{SpendwiseError, SpendwiseResult};
use crate::models::Money;
use crate::storage::Storage;

/// Headline totals for the current user
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardSummary {
    /// All non-settlement spending
    pub total_spent: Money,
    /// Sum of every account balance
    pub total_balance: Money,
    pub account_count: usize,
    pub transaction_count: usize,
    pub goal_count: usize,
}

impl DashboardSummary {
    pub fn generate(storage: &Storage) -> SpendwiseResult<Self> {
        let transactions = storage.transactions.get_all()?;
        let accounts = storage.accounts.get_all()?;

        let total_spent = Money::checked_sum(
            transactions
                .iter()
                .filter(|t| t.is_spending())
                .map(|t| t.amount),
        )
        .ok_or_else(|| SpendwiseError::InvalidAmount("total spending out of range".into()))?;
        let total_balance = Money::checked_sum(accounts.iter().map(|a| a.balance))
            .ok_or_else(|| SpendwiseError::InvalidAmount("total balance out of range".into()))?;

        Ok(Self {
            total_spent,
            total_balance,
            account_count: accounts.len(),
            transaction_count: transactions.len(),
            goal_count: storage.budgets.count()?,
        })
    }
}
