//! Storage layer for Spendwise
//!
//! Per-user JSON document collections with atomic writes, an audit trail
//! and a change feed. Every read-modify-write of a collection happens while
//! holding the user's [`LedgerGuard`], which also locks the user directory
//! against other processes and reloads the collections from disk. Balance
//! mutations go through [`Storage::commit_ledger`].

pub mod accounts;
pub mod budget;
pub mod feed;
pub mod file_io;
pub mod profile;
pub mod transactions;

pub use accounts::AccountRepository;
pub use budget::BudgetGoalRepository;
pub use feed::{ChangeEvent, ChangeFeed, ChangeOperation, Collection};
pub use file_io::{read_json, write_json_atomic};
pub use profile::ProfileStore;
pub use transactions::TransactionRepository;

use std::fs::{File, OpenOptions};
use std::sync::mpsc::Receiver;
use std::sync::{Mutex, MutexGuard};

use chrono::Utc;
use fs2::FileExt;
use serde::Serialize;
use tracing::{debug, error};

use crate::audit::{AuditEntry, AuditLogger, EntityType};
use crate::config::paths::{SpendwisePaths, UserPaths};
use crate::error::{SpendwiseError, SpendwiseResult};
use crate::models::{AccountId, Money, Transaction, TransactionId, UserId};

/// Proof that the caller holds the user's ledger lock
///
/// All balance reads that feed a write must happen while this is alive.
/// The OS lock on the user's lock file is released when the file is closed.
pub struct LedgerGuard<'a> {
    _lock_file: File,
    _guard: MutexGuard<'a, ()>,
}

/// Change to the transaction collection committed alongside balances
#[derive(Debug, Clone)]
pub enum RecordChange {
    Upsert(Transaction),
    Delete(TransactionId),
}

/// One atomic unit of ledger work
#[derive(Debug, Clone)]
pub struct LedgerCommit {
    /// New balance per account
    pub balances: Vec<(AccountId, Money)>,
    pub record: RecordChange,
}

/// Main storage coordinator for one user
pub struct Storage {
    user: UserId,
    paths: UserPaths,
    pub accounts: AccountRepository,
    pub transactions: TransactionRepository,
    pub budgets: BudgetGoalRepository,
    pub profile: ProfileStore,
    audit: AuditLogger,
    feed: ChangeFeed,
    ledger: Mutex<()>,
}

impl Storage {
    /// Open (and create if needed) the collections of a user
    pub fn open(paths: &SpendwisePaths, user: UserId) -> SpendwiseResult<Self> {
        let user_paths = paths.for_user(&user);
        user_paths.ensure_directories()?;

        Ok(Self {
            accounts: AccountRepository::new(user_paths.accounts_file()),
            transactions: TransactionRepository::new(user_paths.transactions_file()),
            budgets: BudgetGoalRepository::new(user_paths.budgets_file()),
            profile: ProfileStore::new(user_paths.profile_file(), user_paths.preferences_file()),
            audit: AuditLogger::new(user_paths.audit_log()),
            feed: ChangeFeed::new(),
            ledger: Mutex::new(()),
            paths: user_paths,
            user,
        })
    }

    pub fn user(&self) -> &UserId {
        &self.user
    }

    pub fn paths(&self) -> &UserPaths {
        &self.paths
    }

    pub fn audit(&self) -> &AuditLogger {
        &self.audit
    }

    /// Load all collections from disk
    pub fn load_all(&self) -> SpendwiseResult<()> {
        self.accounts.load()?;
        self.transactions.load()?;
        self.budgets.load()?;
        self.profile.load()?;
        debug!(user = %self.user, "Loaded user collections");
        Ok(())
    }

    /// Acquire the lock serialising writes to this user's collections
    ///
    /// Blocks until no other thread or process holds it, then reloads every
    /// collection from disk so reads under the guard see the latest commit.
    /// Not reentrant.
    pub fn ledger_guard(&self) -> SpendwiseResult<LedgerGuard<'_>> {
        let guard = self
            .ledger
            .lock()
            .map_err(|e| SpendwiseError::Storage(format!("Failed to acquire ledger lock: {}", e)))?;

        let lock_path = self.paths.lock_file();
        let lock_file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(&lock_path)
            .map_err(|e| {
                SpendwiseError::Storage(format!(
                    "Failed to open lock file {}: {}",
                    lock_path.display(),
                    e
                ))
            })?;
        lock_file.lock_exclusive().map_err(|e| {
            SpendwiseError::Storage(format!("Failed to lock {}: {}", lock_path.display(), e))
        })?;

        self.load_all()?;

        Ok(LedgerGuard {
            _lock_file: lock_file,
            _guard: guard,
        })
    }

    /// Apply balances and the transaction record change as one unit
    ///
    /// On any persistence failure the in-memory collections and the files on
    /// disk are put back to their previous state and the error is returned.
    pub fn commit_ledger(
        &self,
        _guard: &LedgerGuard<'_>,
        commit: LedgerCommit,
    ) -> SpendwiseResult<()> {
        let accounts_before = self.accounts.snapshot()?;
        let transactions_before = self.transactions.snapshot()?;
        let record_operation = match &commit.record {
            RecordChange::Upsert(txn) if transactions_before.contains_key(&txn.id) => {
                ChangeOperation::Updated
            }
            RecordChange::Upsert(_) => ChangeOperation::Created,
            RecordChange::Delete(_) => ChangeOperation::Deleted,
        };

        let result = self
            .apply_commit(&commit)
            .and_then(|_| self.accounts.save())
            .and_then(|_| self.transactions.save());

        if let Err(err) = result {
            error!(error = %err, "Ledger commit failed, rolling back");
            self.accounts.restore(accounts_before)?;
            self.transactions.restore(transactions_before)?;
            if let Err(restore_err) = self.accounts.save().and_then(|_| self.transactions.save()) {
                error!(error = %restore_err, "Failed to restore collections after rollback");
            }
            return Err(err);
        }

        let account_ids = commit
            .balances
            .iter()
            .map(|(id, _)| id.to_string())
            .collect::<Vec<_>>();
        if !account_ids.is_empty() {
            self.notify(Collection::Accounts, ChangeOperation::Updated, account_ids);
        }
        let record_id = match &commit.record {
            RecordChange::Upsert(txn) => txn.id,
            RecordChange::Delete(id) => *id,
        };
        self.notify(
            Collection::Transactions,
            record_operation,
            vec![record_id.to_string()],
        );

        Ok(())
    }

    fn apply_commit(&self, commit: &LedgerCommit) -> SpendwiseResult<()> {
        let now = Utc::now();
        for (id, balance) in &commit.balances {
            let mut account = self
                .accounts
                .get(*id)?
                .ok_or_else(|| SpendwiseError::account_not_found(id.to_string()))?;
            account.balance = *balance;
            account.updated_at = now;
            self.accounts.upsert(account)?;
        }

        match &commit.record {
            RecordChange::Upsert(txn) => self.transactions.upsert(txn.clone()),
            RecordChange::Delete(id) => self.transactions.delete(*id).map(|_| ()),
        }
    }

    /// Subscribe to changes of one collection
    pub fn subscribe(&self, collection: Collection) -> Receiver<ChangeEvent> {
        self.feed.subscribe(collection)
    }

    /// Publish a change to subscribers
    pub fn notify(&self, collection: Collection, operation: ChangeOperation, ids: Vec<String>) {
        self.feed.publish(ChangeEvent::new(collection, operation, ids));
    }

    /// Record a create in the audit log
    pub fn log_create<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        entity: &T,
    ) -> SpendwiseResult<()> {
        self.audit
            .log(&AuditEntry::create(entity_type, entity_id, entity_name, entity))
    }

    /// Record an update in the audit log
    pub fn log_update<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        before: &T,
        after: &T,
    ) -> SpendwiseResult<()> {
        self.audit.log(&AuditEntry::update(
            entity_type,
            entity_id,
            entity_name,
            before,
            after,
        ))
    }

    /// Record a delete in the audit log
    pub fn log_delete<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        entity: &T,
    ) -> SpendwiseResult<()> {
        self.audit
            .log(&AuditEntry::delete(entity_type, entity_id, entity_name, entity))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Account, AccountType, TransactionDraft};
    use chrono::{NaiveDate, NaiveTime};
    use tempfile::TempDir;

    fn open_storage(temp_dir: &TempDir) -> Storage {
        let paths = SpendwisePaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::open(&paths, UserId::new("tester").unwrap()).unwrap();
        storage.load_all().unwrap();
        storage
    }

    fn expense(account: AccountId, units: i64) -> Transaction {
        Transaction::from_draft(TransactionDraft::expense(
            account,
            Money::from_units(units),
            NaiveDate::from_ymd_opt(2025, 2, 1).unwrap(),
            NaiveTime::from_hms_opt(8, 0, 0).unwrap(),
        ))
    }

    #[test]
    fn test_open_creates_user_directory() {
        let temp_dir = TempDir::new().unwrap();
        let storage = open_storage(&temp_dir);
        assert!(temp_dir.path().join("users").join("tester").exists());
        assert_eq!(storage.user().as_str(), "tester");
    }

    #[test]
    fn test_commit_persists_both_collections() {
        let temp_dir = TempDir::new().unwrap();
        let storage = open_storage(&temp_dir);

        let account =
            Account::with_opening_balance("Wallet", AccountType::Cash, Money::from_units(100));
        let id = account.id;
        storage.accounts.upsert(account).unwrap();
        storage.accounts.save().unwrap();

        let txn = expense(id, 30);
        let guard = storage.ledger_guard().unwrap();
        storage
            .commit_ledger(
                &guard,
                LedgerCommit {
                    balances: vec![(id, Money::from_units(70))],
                    record: RecordChange::Upsert(txn.clone()),
                },
            )
            .unwrap();
        drop(guard);

        let reopened = open_storage(&temp_dir);
        assert_eq!(
            reopened.accounts.get(id).unwrap().unwrap().balance,
            Money::from_units(70)
        );
        assert!(reopened.transactions.get(txn.id).unwrap().is_some());
    }

    #[test]
    fn test_failed_commit_rolls_back() {
        let temp_dir = TempDir::new().unwrap();
        let storage = open_storage(&temp_dir);

        let account =
            Account::with_opening_balance("Wallet", AccountType::Cash, Money::from_units(100));
        let id = account.id;
        storage.accounts.upsert(account).unwrap();
        storage.accounts.save().unwrap();

        let txn = expense(id, 30);
        let guard = storage.ledger_guard().unwrap();

        // A directory where the transactions file should be makes the save fail
        std::fs::create_dir_all(storage.paths().transactions_file()).unwrap();

        let result = storage.commit_ledger(
            &guard,
            LedgerCommit {
                balances: vec![(id, Money::from_units(70))],
                record: RecordChange::Upsert(txn.clone()),
            },
        );
        drop(guard);

        assert!(result.is_err());
        assert_eq!(
            storage.accounts.get(id).unwrap().unwrap().balance,
            Money::from_units(100)
        );
        assert!(storage.transactions.get(txn.id).unwrap().is_none());

        let on_disk = AccountRepository::new(storage.paths().accounts_file());
        on_disk.load().unwrap();
        assert_eq!(
            on_disk.get(id).unwrap().unwrap().balance,
            Money::from_units(100)
        );
    }

    #[test]
    fn test_commit_publishes_change_events() {
        let temp_dir = TempDir::new().unwrap();
        let storage = open_storage(&temp_dir);
        let accounts_feed = storage.subscribe(Collection::Accounts);
        let transactions_feed = storage.subscribe(Collection::Transactions);

        let account = Account::new("Wallet", AccountType::Cash);
        let id = account.id;
        storage.accounts.upsert(account).unwrap();
        storage.accounts.save().unwrap();

        let guard = storage.ledger_guard().unwrap();
        storage
            .commit_ledger(
                &guard,
                LedgerCommit {
                    balances: vec![(id, Money::from_units(-5))],
                    record: RecordChange::Upsert(expense(id, 5)),
                },
            )
            .unwrap();

        assert_eq!(accounts_feed.try_recv().unwrap().ids, vec![id.to_string()]);
        assert_eq!(
            transactions_feed.try_recv().unwrap().operation,
            ChangeOperation::Created
        );
    }

    #[test]
    fn test_audit_helpers_write_log() {
        let temp_dir = TempDir::new().unwrap();
        let storage = open_storage(&temp_dir);
        let account = Account::new("Wallet", AccountType::Cash);

        storage
            .log_create(
                EntityType::Account,
                account.id.to_string(),
                Some(account.name.clone()),
                &account,
            )
            .unwrap();

        assert_eq!(storage.audit().read_all().unwrap().len(), 1);
    }
}
