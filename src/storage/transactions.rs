//! Transaction repository for JSON storage
//!
//! Manages loading and saving transactions to transactions.json

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use chrono::NaiveDate;

use crate::error::SpendwiseError;
use crate::models::{AccountId, Transaction, TransactionId};

use super::file_io::{read_json, write_json_atomic};

/// Serializable transaction data structure
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct TransactionData {
    transactions: Vec<Transaction>,
}

/// Newest first: date, then time, then creation
fn newest_first(a: &Transaction, b: &Transaction) -> std::cmp::Ordering {
    b.occurred_at()
        .cmp(&a.occurred_at())
        .then(b.created_at.cmp(&a.created_at))
}

/// Accounts a transaction touches (source, plus target for settlements)
fn touched_accounts(txn: &Transaction) -> impl Iterator<Item = AccountId> {
    let target = if txn.is_settlement {
        txn.target_account_id
    } else {
        None
    };
    std::iter::once(txn.account_id).chain(target)
}

/// Repository for transaction persistence with an account index
pub struct TransactionRepository {
    path: PathBuf,
    data: RwLock<HashMap<TransactionId, Transaction>>,
    /// Index: account_id -> transaction_ids (both settlement legs)
    by_account: RwLock<HashMap<AccountId, Vec<TransactionId>>>,
}

impl TransactionRepository {
    /// Create a new transaction repository
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(HashMap::new()),
            by_account: RwLock::new(HashMap::new()),
        }
    }

    /// Load transactions from disk and build the index
    pub fn load(&self) -> Result<(), SpendwiseError> {
        let file_data: TransactionData = read_json(&self.path)?;
        let map = file_data
            .transactions
            .into_iter()
            .map(|txn| (txn.id, txn))
            .collect();
        self.restore(map)
    }

    /// Save transactions to disk
    pub fn save(&self) -> Result<(), SpendwiseError> {
        let transactions = self.get_all()?;
        write_json_atomic(&self.path, &TransactionData { transactions })
    }

    /// Get a transaction by ID
    pub fn get(&self, id: TransactionId) -> Result<Option<Transaction>, SpendwiseError> {
        let data = self.data.read().map_err(|e| {
            SpendwiseError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;

        Ok(data.get(&id).cloned())
    }

    /// Get all transactions, newest first
    pub fn get_all(&self) -> Result<Vec<Transaction>, SpendwiseError> {
        let data = self.data.read().map_err(|e| {
            SpendwiseError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;

        let mut transactions: Vec<_> = data.values().cloned().collect();
        transactions.sort_by(newest_first);
        Ok(transactions)
    }

    /// Get transactions touching an account on either leg
    pub fn get_by_account(
        &self,
        account_id: AccountId,
    ) -> Result<Vec<Transaction>, SpendwiseError> {
        let data = self.data.read().map_err(|e| {
            SpendwiseError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;
        let by_account = self.by_account.read().map_err(|e| {
            SpendwiseError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;

        let ids = by_account
            .get(&account_id)
            .map(|v| v.as_slice())
            .unwrap_or(&[]);
        let mut transactions: Vec<_> = ids.iter().filter_map(|id| data.get(id).cloned()).collect();
        transactions.sort_by(newest_first);
        Ok(transactions)
    }

    /// Get transactions in an inclusive date range
    pub fn get_by_date_range(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Transaction>, SpendwiseError> {
        let all = self.get_all()?;
        Ok(all
            .into_iter()
            .filter(|t| t.date >= start && t.date <= end)
            .collect())
    }

    /// Whether any transaction references the account
    pub fn references_account(&self, account_id: AccountId) -> Result<bool, SpendwiseError> {
        let by_account = self.by_account.read().map_err(|e| {
            SpendwiseError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;

        Ok(by_account
            .get(&account_id)
            .is_some_and(|ids| !ids.is_empty()))
    }

    /// Insert or update a transaction
    pub fn upsert(&self, txn: Transaction) -> Result<(), SpendwiseError> {
        let mut data = self.data.write().map_err(|e| {
            SpendwiseError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;
        let mut by_account = self.by_account.write().map_err(|e| {
            SpendwiseError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;

        if let Some(old) = data.get(&txn.id) {
            for account in touched_accounts(old) {
                if let Some(ids) = by_account.get_mut(&account) {
                    ids.retain(|&id| id != txn.id);
                }
            }
        }

        for account in touched_accounts(&txn) {
            by_account.entry(account).or_default().push(txn.id);
        }

        data.insert(txn.id, txn);
        Ok(())
    }

    /// Delete a transaction
    pub fn delete(&self, id: TransactionId) -> Result<bool, SpendwiseError> {
        let mut data = self.data.write().map_err(|e| {
            SpendwiseError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;
        let mut by_account = self.by_account.write().map_err(|e| {
            SpendwiseError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;

        let Some(old) = data.remove(&id) else {
            return Ok(false);
        };

        for account in touched_accounts(&old) {
            if let Some(ids) = by_account.get_mut(&account) {
                ids.retain(|&existing| existing != id);
            }
        }

        Ok(true)
    }

    pub fn count(&self) -> Result<usize, SpendwiseError> {
        let data = self.data.read().map_err(|e| {
            SpendwiseError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;

        Ok(data.len())
    }

    /// Copy of the in-memory state, used to roll back a failed commit
    pub(crate) fn snapshot(&self) -> Result<HashMap<TransactionId, Transaction>, SpendwiseError> {
        let data = self.data.read().map_err(|e| {
            SpendwiseError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;

        Ok(data.clone())
    }

    /// Replace the in-memory state and rebuild the index
    pub(crate) fn restore(
        &self,
        snapshot: HashMap<TransactionId, Transaction>,
    ) -> Result<(), SpendwiseError> {
        let mut data = self.data.write().map_err(|e| {
            SpendwiseError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;
        let mut by_account = self.by_account.write().map_err(|e| {
            SpendwiseError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;

        by_account.clear();
        for txn in snapshot.values() {
            for account in touched_accounts(txn) {
                by_account.entry(account).or_default().push(txn.id);
            }
        }
        *data = snapshot;

        Ok(())
    }
}
