//! Transaction service
//!
//! User-facing transaction management. Every change that affects balances
//! is delegated to the [`LedgerEngine`].

use chrono::{NaiveDate, NaiveTime};

use crate::error::{SpendwiseError, SpendwiseResult};
use crate::models::{
    AccountId, Category, Money, Mood, Transaction, TransactionDraft, TransactionId,
};
use crate::storage::Storage;

use super::ledger::LedgerEngine;

/// Service for transaction management
pub struct TransactionService<'a> {
    storage: &'a Storage,
}

/// Options for filtering transactions
#[derive(Debug, Clone, Default)]
pub struct TransactionFilter {
    /// Transactions touching this account on either leg
    pub account_id: Option<AccountId>,
    pub category: Option<Category>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    /// `Some(true)` for settlements only, `Some(false)` for expenses only
    pub settlement: Option<bool>,
    /// Case-insensitive substring of the description
    pub search: Option<String>,
    pub limit: Option<usize>,
}

impl TransactionFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn account(mut self, account_id: AccountId) -> Self {
        self.account_id = Some(account_id);
        self
    }

    pub fn category(mut self, category: Category) -> Self {
        self.category = Some(category);
        self
    }

    pub fn date_range(mut self, start: NaiveDate, end: NaiveDate) -> Self {
        self.start_date = Some(start);
        self.end_date = Some(end);
        self
    }

    pub fn settlements(mut self, settlement: bool) -> Self {
        self.settlement = Some(settlement);
        self
    }

    pub fn search(mut self, text: impl Into<String>) -> Self {
        self.search = Some(text.into());
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    fn matches(&self, txn: &Transaction) -> bool {
        if self.category.is_some_and(|c| c != txn.category) {
            return false;
        }
        if self.start_date.is_some_and(|start| txn.date < start) {
            return false;
        }
        if self.end_date.is_some_and(|end| txn.date > end) {
            return false;
        }
        if self.settlement.is_some_and(|s| s != txn.is_settlement) {
            return false;
        }
        match &self.search {
            Some(text) => txn
                .description
                .to_lowercase()
                .contains(&text.trim().to_lowercase()),
            None => true,
        }
    }
}

/// Partial edit of a transaction; `None` keeps the stored value
#[derive(Debug, Clone, Default)]
pub struct TransactionEdit {
    pub amount: Option<Money>,
    pub category: Option<Category>,
    pub date: Option<NaiveDate>,
    pub time: Option<NaiveTime>,
    pub description: Option<String>,
    pub mood: Option<Mood>,
    pub account_id: Option<AccountId>,
    /// Turn the transaction into a settlement onto this account
    pub settle_to: Option<AccountId>,
    /// Turn a settlement back into a plain expense
    pub clear_settlement: bool,
}

impl TransactionEdit {
    pub fn is_empty(&self) -> bool {
        self.amount.is_none()
            && self.category.is_none()
            && self.date.is_none()
            && self.time.is_none()
            && self.description.is_none()
            && self.mood.is_none()
            && self.account_id.is_none()
            && self.settle_to.is_none()
            && !self.clear_settlement
    }

    fn apply_to(self, draft: &mut TransactionDraft) {
        if let Some(amount) = self.amount {
            draft.amount = amount;
        }
        if let Some(category) = self.category {
            draft.category = category;
        }
        if let Some(date) = self.date {
            draft.date = date;
        }
        if let Some(time) = self.time {
            draft.time = time;
        }
        if let Some(description) = self.description {
            draft.description = description.trim().to_string();
        }
        if let Some(mood) = self.mood {
            draft.mood = mood;
        }
        if let Some(account_id) = self.account_id {
            draft.account_id = account_id;
        }
        if self.clear_settlement {
            draft.is_settlement = false;
            draft.target_account_id = None;
        }
        if let Some(target) = self.settle_to {
            draft.is_settlement = true;
            draft.target_account_id = Some(target);
        }
    }
}

impl<'a> TransactionService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Parse a user-entered amount; must be a non-negative decimal
    pub fn parse_amount(input: &str) -> SpendwiseResult<Money> {
        let amount =
            Money::parse(input).map_err(|e| SpendwiseError::InvalidAmount(e.to_string()))?;
        if amount.is_negative() {
            return Err(SpendwiseError::InvalidAmount(format!(
                "{} (must not be negative)",
                input.trim()
            )));
        }
        Ok(amount)
    }

    /// Record a new transaction
    pub fn create(&self, draft: TransactionDraft) -> SpendwiseResult<Transaction> {
        LedgerEngine::new(self.storage).apply_create(draft)
    }

    /// Pay `amount` from `source` onto `target`
    pub fn settle(
        &self,
        source: AccountId,
        target: AccountId,
        amount: Money,
        date: NaiveDate,
        time: NaiveTime,
        description: Option<String>,
    ) -> SpendwiseResult<Transaction> {
        let mut draft = TransactionDraft::settlement(source, target, amount, date, time);
        draft.category = Category::BillsUtilities;
        if let Some(description) = description {
            draft.description = description.trim().to_string();
        }
        self.create(draft)
    }

    /// Apply a partial edit to a stored transaction
    pub fn update(&self, id: TransactionId, edit: TransactionEdit) -> SpendwiseResult<Transaction> {
        let current = self
            .storage
            .transactions
            .get(id)?
            .ok_or_else(|| SpendwiseError::transaction_not_found(id.to_string()))?;

        if edit.is_empty() {
            return Ok(current);
        }

        LedgerEngine::new(self.storage).apply_update_with(id, |stored| {
            let mut draft = stored.to_draft();
            edit.apply_to(&mut draft);
            draft
        })
    }

    pub fn delete(&self, id: TransactionId) -> SpendwiseResult<Transaction> {
        LedgerEngine::new(self.storage).apply_delete(id)
    }

    pub fn get(&self, id: TransactionId) -> SpendwiseResult<Option<Transaction>> {
        self.storage.transactions.get(id)
    }

    /// Find a transaction by full ID or short display form (`txn-1a2b3c4d`)
    pub fn find(&self, identifier: &str) -> SpendwiseResult<Option<Transaction>> {
        if let Ok(id) = identifier.parse::<TransactionId>() {
            return self.storage.transactions.get(id);
        }

        let mut matches: Vec<_> = self
            .storage
            .transactions
            .get_all()?
            .into_iter()
            .filter(|t| t.id.matches_short(identifier))
            .collect();

        match matches.len() {
            0 => Ok(None),
            1 => Ok(matches.pop()),
            n => Err(SpendwiseError::Validation(format!(
                "'{}' matches {} transactions, use a longer id",
                identifier, n
            ))),
        }
    }

    /// List transactions, newest first
    pub fn list(&self, filter: TransactionFilter) -> SpendwiseResult<Vec<Transaction>> {
        let mut transactions = match (filter.account_id, filter.start_date, filter.end_date) {
            (Some(account_id), _, _) => self.storage.transactions.get_by_account(account_id)?,
            (None, Some(start), Some(end)) => {
                self.storage.transactions.get_by_date_range(start, end)?
            }
            _ => self.storage.transactions.get_all()?,
        };

        transactions.retain(|t| filter.matches(t));

        if let Some(limit) = filter.limit {
            transactions.truncate(limit);
        }

        Ok(transactions)
    }

    pub fn count(&self) -> SpendwiseResult<usize> {
        self.storage.transactions.count()
    }
}
